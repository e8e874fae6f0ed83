//! Performance data tokens in the `'label'=value[UOM];[warn];[crit];[min];[max]` format.

use std::fmt;

use crate::State;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PerfDataError {
    #[error("invalid unit of measurement '{0}'")]
    InvalidUnit(String),
}

/// Unit of measurement appended to a performance data value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Unit {
    None,
    Seconds,
    Milliseconds,
    Microseconds,
    Percentage,
    Bytes,
    Kilobytes,
    Megabytes,
    Terabytes,
    Counter,
    Other(String),
}

impl Unit {
    /// Creates a custom unit. The unit must not contain digits, whitespace, quotes, `;` or `=`
    /// since those would break the performance data format.
    pub fn other(unit: &str) -> Result<Unit, PerfDataError> {
        let invalid = unit.is_empty()
            || unit.chars().any(|c| {
                c.is_ascii_digit() || c.is_whitespace() || matches!(c, ';' | '\'' | '"' | '=')
            });

        if invalid {
            return Err(PerfDataError::InvalidUnit(unit.to_owned()));
        }

        Ok(Unit::Other(unit.to_owned()))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Unit::None => "",
            Unit::Seconds => "s",
            Unit::Milliseconds => "ms",
            Unit::Microseconds => "us",
            Unit::Percentage => "%",
            Unit::Bytes => "B",
            Unit::Kilobytes => "KB",
            Unit::Megabytes => "MB",
            Unit::Terabytes => "TB",
            Unit::Counter => "c",
            Unit::Other(s) => s.as_str(),
        };
        f.write_str(s)
    }
}

/// Which side of a threshold raises an alarm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerIfValue {
    /// Alarm if the value is strictly greater than the threshold.
    Greater,
    /// Alarm if the value is strictly less than the threshold.
    Less,
}

/// A single performance data token.
///
/// ```rust
/// # use monitoringplugins::{PerfData, State, TriggerIfValue, Unit};
/// let latency = PerfData::new("latency", 12)
///     .with_unit(Unit::Milliseconds)
///     .with_thresholds(100, 200, TriggerIfValue::Greater)
///     .with_min(0)
///     .with_max(500);
///
/// assert_eq!(latency.to_string(), "'latency'=12ms;100;200;0;500");
/// assert_eq!(latency.state(), State::Ok);
/// ```
#[derive(Clone, Debug)]
pub struct PerfData<T> {
    label: String,
    value: T,
    unit: Unit,
    warning: Option<T>,
    critical: Option<T>,
    trigger: TriggerIfValue,
    min: Option<T>,
    max: Option<T>,
}

impl<T> PerfData<T> {
    pub fn new(label: &str, value: T) -> Self {
        PerfData {
            label: label.to_owned(),
            value,
            unit: Unit::None,
            warning: None,
            critical: None,
            trigger: TriggerIfValue::Greater,
            min: None,
            max: None,
        }
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_thresholds(
        mut self,
        warning: impl Into<Option<T>>,
        critical: impl Into<Option<T>>,
        trigger: TriggerIfValue,
    ) -> Self {
        self.warning = warning.into();
        self.critical = critical.into();
        self.trigger = trigger;
        self
    }

    pub fn with_min(mut self, min: T) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: T) -> Self {
        self.max = Some(max);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T: PartialOrd> PerfData<T> {
    /// Classifies the value against the thresholds. The critical threshold wins over the warning
    /// one, without thresholds the result is always [State::Ok].
    pub fn state(&self) -> State {
        let breached = |threshold: &Option<T>| match (threshold, self.trigger) {
            (Some(t), TriggerIfValue::Greater) => self.value > *t,
            (Some(t), TriggerIfValue::Less) => self.value < *t,
            (None, _) => false,
        };

        if breached(&self.critical) {
            State::Critical
        } else if breached(&self.warning) {
            State::Warning
        } else {
            State::Ok
        }
    }
}

impl<T: fmt::Display> fmt::Display for PerfData<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.label.replace('=', "_").replace('\'', "''");
        let optional = |v: &Option<T>| v.as_ref().map(|v| v.to_string()).unwrap_or_default();

        let fields = [
            format!("{}{}", self.value, self.unit),
            optional(&self.warning),
            optional(&self.critical),
            optional(&self.min),
            optional(&self.max),
        ];

        write!(f, "'{}'={}", label, fields.join(";").trim_end_matches(';'))
    }
}
