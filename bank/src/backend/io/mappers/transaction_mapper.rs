use crate::backend::domain::commands::ledger::LedgerResult;
use crate::backend::domain::models::Transaction as DomainTransaction;
use crate::backend::domain::transaction_service::ReconciliationReport;
use shared::{AdjustBalanceResponse, ReconciliationResponse, Transaction as SharedTransaction, TransactionListResponse};

/// Mapper to convert domain transactions to shared DTOs.
pub struct TransactionMapper;

impl TransactionMapper {
    /// Timestamps become RFC 3339 strings.
    pub fn to_dto(domain: DomainTransaction) -> SharedTransaction {
        SharedTransaction {
            id: domain.id,
            account_id: domain.account_id,
            amount: domain.amount,
            description: domain.description,
            timestamp: domain.timestamp.to_rfc3339(),
            transaction_type: domain.transaction_type,
            category: domain.category,
        }
    }

    pub fn to_list_dto(transactions: Vec<DomainTransaction>) -> TransactionListResponse {
        TransactionListResponse {
            transactions: transactions.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_reconciliation_dto(report: ReconciliationReport) -> ReconciliationResponse {
        ReconciliationResponse {
            account_id: report.account_id,
            replayed_balance: report.replayed_balance,
            actual_balance: report.actual_balance,
            discrepancy: report.discrepancy,
            transaction_count: report.transaction_count,
        }
    }

    pub fn to_adjust_response_dto(result: LedgerResult, message: &str) -> AdjustBalanceResponse {
        AdjustBalanceResponse {
            new_balance: result.child.balance,
            transaction: Self::to_dto(result.transaction),
            success_message: message.to_string(),
        }
    }
}
