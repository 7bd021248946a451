use {
    super::error::GatewayError,
    serde::Serialize,
    std::fmt,
};

/// Transaction amount in currency major units, as the legacy caller sends
/// it. Positive and finite by construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
    pub fn new(value: f64) -> Result<Self, GatewayError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(GatewayError::Validation(format!(
                "amount must be a positive number, got: {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The currencies the legacy platform transacts in, keyed by their ISO 4217
/// numeric codes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Usd,
    Cad,
    Gbp,
    Eur,
}

impl Currency {
    pub fn from_numeric(code: u16) -> Result<Self, GatewayError> {
        match code {
            840 => Ok(Self::Usd),
            124 => Ok(Self::Cad),
            826 => Ok(Self::Gbp),
            978 => Ok(Self::Eur),
            other => Err(GatewayError::Validation(format!(
                "unknown currency code: {other}"
            ))),
        }
    }

    pub fn numeric(self) -> u16 {
        match self {
            Self::Usd => 840,
            Self::Cad => 124,
            Self::Gbp => 826,
            Self::Eur => 978,
        }
    }

    pub fn alpha(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Cad => "CAD",
            Self::Gbp => "GBP",
            Self::Eur => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.alpha())
    }
}
