use super::{AttendancePayload, ConnectivityProbe, RemoteAck, RemoteStore, SheetInfo};
use crate::errors::RemoteError;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct SheetsResponse {
    #[serde(default)]
    sheets: Vec<SheetInfo>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SheetDataResponse {
    #[serde(default)]
    data: Option<Vec<Vec<Value>>>,
    #[serde(default)]
    error: Option<String>,
}

/// `RemoteStore` backed by the sheet web-hook over HTTP.
pub struct HttpRemote {
    client: Client,
    url: String,
}

impl HttpRemote {
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            client,
            url: url.trim().to_string(),
        })
    }

    fn post_action(&self, body: &Value) -> Result<(), RemoteError> {
        let ack: RemoteAck = self
            .client
            .post(&self.url)
            .json(body)
            .send()?
            .error_for_status()?
            .json()?;

        ack.into_result()
    }
}

impl RemoteStore for HttpRemote {
    fn append_attendance(&self, payload: &AttendancePayload) -> Result<RemoteAck, RemoteError> {
        let ack = self
            .client
            .post(&self.url)
            .json(payload)
            .send()?
            .error_for_status()?
            .json::<RemoteAck>()?;

        Ok(ack)
    }

    fn list_sheets(&self) -> Result<Vec<SheetInfo>, RemoteError> {
        let resp: SheetsResponse = self
            .client
            .get(&self.url)
            .query(&[("action", "listSheets")])
            .send()?
            .error_for_status()?
            .json()?;

        if let Some(err) = resp.error {
            return Err(RemoteError::Rejected(err));
        }

        Ok(resp.sheets)
    }

    fn sheet_data(&self, sheet: &str) -> Result<Vec<Vec<String>>, RemoteError> {
        let resp: SheetDataResponse = self
            .client
            .get(&self.url)
            .query(&[("action", "getSheetData"), ("sheetName", sheet)])
            .send()?
            .error_for_status()?
            .json()?;

        match (resp.data, resp.error) {
            (_, Some(err)) => Err(RemoteError::Rejected(err)),
            (Some(rows), None) => Ok(rows
                .into_iter()
                .map(|row| row.into_iter().map(cell_to_string).collect())
                .collect()),
            (None, None) => Err(RemoteError::Rejected(format!(
                "no data found in sheet '{sheet}'"
            ))),
        }
    }

    fn create_sheet(&self, sheet: &str) -> Result<(), RemoteError> {
        self.post_action(&json!({ "action": "createSheet", "sheetName": sheet }))
    }

    fn delete_sheet(&self, sheet: &str) -> Result<(), RemoteError> {
        self.post_action(&json!({ "action": "deleteSheet", "sheetName": sheet }))
    }

    fn set_visibility(&self, sheet: &str, visible: bool) -> Result<(), RemoteError> {
        self.post_action(&json!({
            "action": "toggleVisibility",
            "sheetName": sheet,
            "visible": visible,
        }))
    }
}

impl ConnectivityProbe for HttpRemote {
    fn is_reachable(&self) -> bool {
        if self.url.is_empty() {
            return false;
        }

        // Any HTTP answer means the endpoint is up; only transport errors count.
        self.client.get(&self.url).send().is_ok()
    }
}

fn cell_to_string(v: Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}
