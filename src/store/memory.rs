//! In-memory store used by unit tests of the reconciliation pipeline.

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;

use super::{BudgetStore, LedgerStore};
use crate::budget::models::Budget;
use crate::errors::AppError;
use crate::period::Period;
use crate::summary::MonthlySpendingEntry;
use crate::transaction::models::{NewTransaction, Transaction};

#[derive(Debug, Default)]
pub struct MemoryStore {
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    /// Make every budget write fail, to exercise error propagation.
    pub fail_budget_writes: bool,
    /// Every (category, period) passed to `lock_budget`, in call order.
    pub lock_log: Vec<(String, Period)>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn add_budget(
        &mut self,
        user_id: i64,
        category: &str,
        month: i16,
        year: i16,
        budgeted_amount: Decimal,
    ) -> i64 {
        let id = self.next_id();
        let now = Utc::now();
        self.budgets.push(Budget {
            id,
            user_id,
            category: category.to_string(),
            month,
            year,
            budgeted_amount,
            actual_amount: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub fn budget(&self, id: i64) -> &Budget {
        self.budgets
            .iter()
            .find(|b| b.id == id)
            .expect("budget should exist in test store")
    }
}

impl LedgerStore for MemoryStore {
    async fn insert_transaction(
        &mut self,
        user_id: i64,
        new: &NewTransaction,
    ) -> Result<Transaction, AppError> {
        let now = Utc::now();
        let transaction = Transaction {
            id: self.next_id(),
            user_id,
            amount: new.amount,
            category: new.category.clone(),
            transaction_date: new.date,
            description: new.description.clone(),
            created_at: now,
            updated_at: now,
        };
        self.transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn list_transactions(&mut self, user_id: i64) -> Result<Vec<Transaction>, AppError> {
        let mut rows: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
        Ok(rows)
    }

    async fn find_transaction(
        &mut self,
        user_id: i64,
        transaction_id: i64,
    ) -> Result<Option<Transaction>, AppError> {
        Ok(self
            .transactions
            .iter()
            .find(|t| t.id == transaction_id && t.user_id == user_id)
            .cloned())
    }

    async fn lock_transaction(
        &mut self,
        user_id: i64,
        transaction_id: i64,
    ) -> Result<Option<Transaction>, AppError> {
        self.find_transaction(user_id, transaction_id).await
    }

    async fn update_transaction(
        &mut self,
        user_id: i64,
        transaction_id: i64,
        new: &NewTransaction,
    ) -> Result<Option<Transaction>, AppError> {
        let Some(row) = self
            .transactions
            .iter_mut()
            .find(|t| t.id == transaction_id && t.user_id == user_id)
        else {
            return Ok(None);
        };

        row.amount = new.amount;
        row.category = new.category.clone();
        row.transaction_date = new.date;
        row.description = new.description.clone();
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete_transaction(
        &mut self,
        user_id: i64,
        transaction_id: i64,
    ) -> Result<Option<Transaction>, AppError> {
        let position = self
            .transactions
            .iter()
            .position(|t| t.id == transaction_id && t.user_id == user_id);
        Ok(position.map(|i| self.transactions.remove(i)))
    }

    async fn monthly_spending(
        &mut self,
        user_id: i64,
        period: Period,
    ) -> Result<Vec<MonthlySpendingEntry>, AppError> {
        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for t in self
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id && period.contains(t.transaction_date))
        {
            *totals.entry(t.category.clone()).or_insert(Decimal::ZERO) += t.amount;
        }

        Ok(totals
            .into_iter()
            .map(|(category, total)| MonthlySpendingEntry { category, total })
            .collect())
    }

    async fn total_spending(&mut self, user_id: i64) -> Result<Decimal, AppError> {
        Ok(self
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .map(|t| t.amount)
            .sum())
    }
}

impl BudgetStore for MemoryStore {
    async fn lock_budget(
        &mut self,
        user_id: i64,
        category: &str,
        period: Period,
    ) -> Result<Option<i64>, AppError> {
        self.lock_log.push((category.to_string(), period));
        Ok(self
            .budgets
            .iter()
            .find(|b| {
                b.user_id == user_id
                    && b.category == category
                    && b.month == period.month
                    && b.year == period.year
            })
            .map(|b| b.id))
    }

    async fn set_actual_amount(
        &mut self,
        budget_id: i64,
        actual: Decimal,
    ) -> Result<(), AppError> {
        if self.fail_budget_writes {
            return Err(AppError::InternalError("budget write failed".to_string()));
        }
        if let Some(budget) = self.budgets.iter_mut().find(|b| b.id == budget_id) {
            budget.actual_amount = actual;
            budget.updated_at = Utc::now();
        }
        Ok(())
    }
}
