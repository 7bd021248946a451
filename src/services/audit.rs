use crate::domain::audit::{AuditLevel, AuditRecord};

/// Outbound audit channel. Exactly one record per transaction attempt flows
/// through here, on completions and failures alike.
pub trait AuditSink: Send + Sync {
    fn emit(&self, record: &AuditRecord);
}

/// Production sink: one structured tracing event per record, on a dedicated
/// target so the log collector can route audit traffic separately from
/// operational logging.
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn emit(&self, record: &AuditRecord) {
        let transaction_id = record
            .transaction_id
            .map(|id| id.to_string())
            .unwrap_or_default();
        match record.level {
            AuditLevel::Audit => tracing::info!(
                target: "paygate::audit",
                level_tag = record.level.as_str(),
                %transaction_id,
                university_id = record.university_id,
                user_id = record.user_id,
                request_uri = record.request_uri,
                request_kind = record.request_kind,
                data = %record.data,
                "transaction attempt"
            ),
            AuditLevel::Error => tracing::error!(
                target: "paygate::audit",
                level_tag = record.level.as_str(),
                %transaction_id,
                university_id = record.university_id,
                user_id = record.user_id,
                request_uri = record.request_uri,
                request_kind = record.request_kind,
                data = %record.data,
                "transaction attempt"
            ),
        }
    }
}
