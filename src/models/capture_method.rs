use serde::Serialize;

/// How an identifier reached the capture path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMethod {
    Scan,
    Manual,
}

impl CaptureMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureMethod::Scan => "scan",
            CaptureMethod::Manual => "manual",
        }
    }

    /// Value expected by the sheet backend in the `method` column.
    pub fn to_wire_str(&self) -> &'static str {
        match self {
            CaptureMethod::Scan => "scanner",
            CaptureMethod::Manual => "manual",
        }
    }
}
