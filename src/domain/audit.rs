use {super::context::TransactionContext, serde_json::Value, uuid::Uuid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditLevel {
    Audit,
    Error,
}

impl AuditLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Audit => "AUDIT",
            Self::Error => "ERROR",
        }
    }
}

/// One structured record per transaction attempt, emitted exactly once when
/// dispatch completes or fails. Correlation fields are absent only when the
/// request arrived without a usable correlation header.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub level: AuditLevel,
    pub transaction_id: Option<Uuid>,
    pub university_id: Option<i64>,
    pub user_id: Option<i64>,
    pub request_uri: &'static str,
    pub request_kind: &'static str,
    pub data: Value,
}

impl AuditRecord {
    pub fn new(
        level: AuditLevel,
        ctx: Option<&TransactionContext>,
        request_uri: &'static str,
        request_kind: &'static str,
        data: Value,
    ) -> Self {
        Self {
            level,
            transaction_id: ctx.map(|c| c.transaction_id),
            university_id: ctx.map(|c| c.university_id),
            user_id: ctx.map(|c| c.user_id),
            request_uri,
            request_kind,
            data,
        }
    }
}
