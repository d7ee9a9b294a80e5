use chrono::NaiveDate;
use sea_orm::{
    Condition, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
    prelude::*,
    sea_query::{Expr, LikeExpr},
};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Transaction, TransactionKind, transactions};

use super::super::{Engine, with_tx};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Filters for searching transactions.
///
/// `from` and `to` are inclusive calendar dates. `text` matches description
/// or notes, case-insensitively.
#[derive(Clone, Debug, Default)]
pub struct TransactionSearch {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
    pub wallet_id: Option<Uuid>,
    pub kind: Option<TransactionKind>,
    pub text: Option<String>,
    /// Page size, defaults to 20 and is capped at 100.
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// One page of search results.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchPage {
    pub transactions: Vec<Transaction>,
    /// Number of matches across all pages.
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

fn validate_search(search: &TransactionSearch) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (search.from, search.to)
        && from > to
    {
        return Err(EngineError::InvalidInput(
            "invalid range: from must be <= to".to_string(),
        ));
    }
    if search.limit == Some(0) {
        return Err(EngineError::InvalidInput("limit must be > 0".to_string()));
    }
    Ok(())
}

/// `%text%` with LIKE wildcards in `text` matched literally.
fn contains_pattern(text: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape('\\')
}

trait ApplySearchFilters: QueryFilter + Sized {
    fn apply_search_filters(self, search: &TransactionSearch) -> Self;
}

impl<T> ApplySearchFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_search_filters(mut self, search: &TransactionSearch) -> Self {
        if let Some(from) = search.from {
            self = self.filter(transactions::Column::Date.gte(from));
        }
        if let Some(to) = search.to {
            self = self.filter(transactions::Column::Date.lte(to));
        }
        if let Some(category_id) = search.category_id {
            self = self.filter(transactions::Column::CategoryId.eq(category_id.to_string()));
        }
        if let Some(wallet_id) = search.wallet_id {
            self = self.filter(transactions::Column::WalletId.eq(wallet_id.to_string()));
        }
        if let Some(kind) = search.kind {
            self = self.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(text) = search.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            self = self.filter(
                Condition::any()
                    .add(Expr::col(transactions::Column::Description).like(contains_pattern(text)))
                    .add(Expr::col(transactions::Column::Notes).like(contains_pattern(text))),
            );
        }
        self
    }
}

impl Engine {
    /// Search the user's transactions, newest first.
    ///
    /// Transfers are included; this is a listing, not an aggregate.
    pub async fn search_transactions(
        &self,
        user_id: Uuid,
        search: TransactionSearch,
    ) -> ResultEngine<SearchPage> {
        validate_search(&search)?;
        let limit = search.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
        let offset = search.offset.unwrap_or(0);

        with_tx!(self, |db_tx| {
            let base = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id.to_string()))
                .apply_search_filters(&search);

            let total = base.clone().count(&db_tx).await?;
            let models = base
                .order_by_desc(transactions::Column::Date)
                .order_by_desc(transactions::Column::CreatedAt)
                .limit(limit)
                .offset(offset)
                .all(&db_tx)
                .await?;
            let transactions = models
                .into_iter()
                .map(Transaction::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            Ok(SearchPage {
                transactions,
                total,
                limit,
                offset,
            })
        })
    }

    /// The `count` most recent transactions of the user.
    pub(crate) async fn recent_transactions(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        count: u64,
    ) -> ResultEngine<Vec<Transaction>> {
        transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::CreatedAt)
            .limit(count)
            .all(db)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }
}
