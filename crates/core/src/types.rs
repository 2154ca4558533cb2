/// All catalog primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Prices are stored in the currency's minor unit (cents, pence, yen).
pub type MinorUnits = i64;
