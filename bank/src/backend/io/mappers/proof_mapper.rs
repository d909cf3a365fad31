use crate::backend::domain::advisory_service::ProofAssessment;
use crate::backend::domain::commands::proofs::ProofDecision;
use crate::backend::domain::models::Proof as DomainProof;
use shared::{DecideProofResponse, PendingProofsResponse, Proof as SharedProof, ProofAnalysis};

use super::TransactionMapper;

/// Mapper from proof workflow results to shared DTOs.
pub struct ProofMapper;

impl ProofMapper {
    pub fn to_dto(domain: DomainProof) -> SharedProof {
        SharedProof {
            id: domain.id,
            task_id: domain.task_id,
            child_id: domain.child_id,
            task_title: domain.task_title,
            reward: domain.reward,
            timestamp: domain.timestamp.to_rfc3339(),
            image_url: domain.image_url,
            notes: domain.notes,
            status: domain.status,
        }
    }

    pub fn to_pending_dto(proofs: Vec<DomainProof>) -> PendingProofsResponse {
        PendingProofsResponse {
            proofs: proofs.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_decision_dto(decision: ProofDecision) -> DecideProofResponse {
        match decision {
            ProofDecision::Approved { proof, transaction } => DecideProofResponse {
                status: Some(proof.status),
                success_message: format!("已核准「{}」，獲得 {} 分鐘", proof.task_title, transaction.amount),
                transaction: Some(TransactionMapper::to_dto(transaction)),
            },
            ProofDecision::Rejected { proof } => DecideProofResponse {
                status: Some(proof.status),
                transaction: None,
                success_message: format!("已退回「{}」", proof.task_title),
            },
            ProofDecision::Discarded { proof } => DecideProofResponse {
                status: Some(proof.status),
                transaction: None,
                success_message: format!("「{}」已移除，未發放獎勵", proof.task_title),
            },
            ProofDecision::NotPending => DecideProofResponse {
                status: None,
                transaction: None,
                success_message: "此證明已處理過".to_string(),
            },
        }
    }

    pub fn to_analysis_dto(assessment: ProofAssessment) -> ProofAnalysis {
        ProofAnalysis {
            score: assessment.score,
            comment: assessment.comment,
        }
    }
}
