use {
    super::error::GatewayError,
    derive_more::Display,
    regex::Regex,
    std::{fmt, sync::LazyLock},
};

static ACCOUNT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{15,16}$").expect("account pattern"));
static EXP_DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}$").expect("expiry pattern"));
static CVV_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3,4}$").expect("cvv pattern"));

/// Masks an account number the way every log line must carry it: all digits
/// replaced with `x` except the last four. Works on unvalidated input too,
/// since rejected requests are still audited.
pub fn mask_account(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let keep = chars.len().saturating_sub(4);
    chars
        .iter()
        .enumerate()
        .map(|(i, c)| if i < keep { 'x' } else { *c })
        .collect()
}

/// Primary account number, 15 or 16 digits. `Debug` and `Display` print the
/// masked form so the raw digits cannot leak through a format string; the
/// clear value is only reachable via `as_str` at the processor call site.
#[derive(Clone, PartialEq, Eq)]
pub struct CardNumber(String);

impl CardNumber {
    pub fn new(raw: impl Into<String>) -> Result<Self, GatewayError> {
        let raw = raw.into();
        if !ACCOUNT_PATTERN.is_match(&raw) {
            return Err(GatewayError::Validation(
                "account must be a 15 or 16 digit number".into(),
            ));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn masked(&self) -> String {
        mask_account(&self.0)
    }
}

impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CardNumber({})", self.masked())
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

/// Card expiry in MMYY wire format.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub struct ExpDate(String);

impl ExpDate {
    pub fn new(raw: impl Into<String>) -> Result<Self, GatewayError> {
        let raw = raw.into();
        if !EXP_DATE_PATTERN.is_match(&raw) {
            return Err(GatewayError::Validation(
                "expDate must be a 4 digit MMYY value".into(),
            ));
        }
        Ok(Self(raw))
    }

    pub fn as_mmyy(&self) -> &str {
        &self.0
    }

    /// `MM/YY`, the format Payload's card object expects.
    pub fn as_mm_slash_yy(&self) -> String {
        format!("{}/{}", &self.0[..2], &self.0[2..])
    }
}

/// Card verification value. Never printed, not even masked.
#[derive(Clone, PartialEq, Eq)]
pub struct Cvv(String);

impl Cvv {
    pub fn new(raw: impl Into<String>) -> Result<Self, GatewayError> {
        let raw = raw.into();
        if !CVV_PATTERN.is_match(&raw) {
            return Err(GatewayError::Validation(
                "cvv2 must be a 3 or 4 digit number".into(),
            ));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Cvv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cvv(***)")
    }
}
