use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use mime::Mime;
use serde::{Deserialize, Serialize};

use super::validation::FieldError;

const DEFAULT_STATEMENT_NAME: &str = "bank-statement";

/// Uploaded bank statement embedded in the payload as a data URL.
///
/// Accepts either the attachment object or the bare data URL string a file widget posts
/// (`data:application/pdf;name=march.pdf;base64,...`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StatementWire")]
pub struct BankStatement {
    pub file_name: String,
    pub media_type: String,
    pub data_url: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StatementWire {
    DataUrl(String),
    #[serde(rename_all = "camelCase")]
    Attachment {
        file_name: String,
        media_type: String,
        data_url: String,
    },
}

impl From<StatementWire> for BankStatement {
    fn from(wire: StatementWire) -> Self {
        match wire {
            StatementWire::DataUrl(url) => Self::from_data_url(url),
            StatementWire::Attachment {
                file_name,
                media_type,
                data_url,
            } => Self {
                file_name,
                media_type,
                data_url,
            },
        }
    }
}

impl BankStatement {
    /// Encode raw file contents, rejecting anything other than PDF, JPEG or PNG.
    pub fn from_bytes(
        file_name: impl Into<String>,
        media_type: &Mime,
        bytes: &[u8],
    ) -> Result<Self, FieldError> {
        let essence = media_type.essence_str();
        if !is_accepted(media_type) {
            return Err(FieldError::UnsupportedMediaType(essence.to_string()));
        }

        Ok(Self {
            file_name: file_name.into(),
            media_type: essence.to_string(),
            data_url: format!("data:{essence};base64,{}", STANDARD.encode(bytes)),
        })
    }

    /// Wrap a bare data URL, taking the file name from its `name` parameter when present.
    ///
    /// Never fails: a URL that does not parse keeps an empty media type and is reported by
    /// [`validate_bank_statement`].
    pub fn from_data_url(data_url: String) -> Self {
        let (file_name, media_type) = match DataUrl::parse(&data_url) {
            Some(parsed) => (
                parsed.name.unwrap_or(DEFAULT_STATEMENT_NAME).to_string(),
                parsed.media_type.to_ascii_lowercase(),
            ),
            None => (DEFAULT_STATEMENT_NAME.to_string(), String::new()),
        };

        Self {
            file_name,
            media_type,
            data_url,
        }
    }

    /// Decode the embedded contents back into bytes.
    pub fn contents(&self) -> Result<Vec<u8>, FieldError> {
        let malformed = || FieldError::MalformedDataUrl(self.file_name.clone());
        let parsed = DataUrl::parse(&self.data_url).ok_or_else(malformed)?;
        if !parsed.media_type.eq_ignore_ascii_case(self.media_type.trim()) {
            return Err(malformed());
        }

        STANDARD.decode(parsed.payload).map_err(|_| malformed())
    }
}

/// Pieces of a `data:<mediatype>[;param...];base64,<payload>` URL.
#[derive(Debug, PartialEq, Eq)]
struct DataUrl<'a> {
    media_type: &'a str,
    name: Option<&'a str>,
    payload: &'a str,
}

impl<'a> DataUrl<'a> {
    fn parse(url: &'a str) -> Option<Self> {
        let scheme = url.get(..5)?;
        if !scheme.eq_ignore_ascii_case("data:") {
            return None;
        }
        let (header, payload) = url[5..].split_once(',')?;

        let mut parts = header.split(';');
        let media_type = parts.next()?.trim();
        let mut name = None;
        let mut base64 = false;
        for param in parts {
            let param = param.trim();
            if param.eq_ignore_ascii_case("base64") {
                base64 = true;
            } else if let Some((key, value)) = param.split_once('=') {
                if key.trim().eq_ignore_ascii_case("name") {
                    name = Some(value.trim());
                }
            }
        }

        (base64 && !media_type.is_empty()).then_some(Self {
            media_type,
            name,
            payload,
        })
    }
}

fn is_accepted(media_type: &Mime) -> bool {
    [mime::APPLICATION_PDF, mime::IMAGE_JPEG, mime::IMAGE_PNG]
        .iter()
        .any(|accepted| {
            media_type
                .essence_str()
                .eq_ignore_ascii_case(accepted.essence_str())
        })
}

/// Checks the declared media type and that the data URL decodes.
pub fn validate_bank_statement(statement: &BankStatement) -> Result<(), FieldError> {
    let media_type: Mime = statement
        .media_type
        .trim()
        .parse()
        .map_err(|_| FieldError::UnsupportedMediaType(statement.media_type.clone()))?;
    if !is_accepted(&media_type) {
        return Err(FieldError::UnsupportedMediaType(
            statement.media_type.clone(),
        ));
    }

    statement.contents().map(|_| ())
}
