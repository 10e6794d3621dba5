use crate::domain::model::LoginResult;
use crate::utils::error::{PortalError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Child elements of the document root that carry the login verdict.
#[derive(Clone, Copy)]
enum Field {
    Status,
    Message,
}

/// Reads the portal's XML reply into a [`LoginResult`].
///
/// Only direct children of the root element are considered, and a field's
/// value is all text beneath it (nested markup included), trimmed. Either
/// field may be missing, in which case it reads as an empty string. A body
/// that is not a single well-formed element is a protocol error.
pub struct ResponseInterpreter;

impl ResponseInterpreter {
    pub fn parse(raw_body: &str) -> Result<LoginResult> {
        let mut reader = Reader::from_str(raw_body);

        let mut depth = 0usize;
        let mut seen_root = false;
        // Field being read; stays set through nested markup until its own end tag.
        let mut capturing: Option<Field> = None;
        let mut status: Option<String> = None;
        let mut message: Option<String> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| PortalError::protocol(format!("malformed XML: {}", e), raw_body))?;

            match event {
                Event::Start(element) => {
                    if depth == 0 {
                        if seen_root {
                            return Err(PortalError::protocol("more than one root element", raw_body));
                        }
                        seen_root = true;
                    }
                    depth += 1;
                    if depth == 2 {
                        capturing = match element.local_name().as_ref() {
                            b"status" if status.is_none() => Some(Field::Status),
                            b"message" if message.is_none() => Some(Field::Message),
                            _ => None,
                        };
                        // 先佔位，讓空元素也算「已出現」
                        match capturing {
                            Some(Field::Status) => status = Some(String::new()),
                            Some(Field::Message) => message = Some(String::new()),
                            None => {}
                        }
                    }
                }
                Event::Empty(_) if depth == 0 => {
                    if seen_root {
                        return Err(PortalError::protocol("more than one root element", raw_body));
                    }
                    seen_root = true;
                }
                Event::Empty(_) => {}
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    if depth < 2 {
                        capturing = None;
                    }
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| PortalError::protocol(format!("bad entity: {}", e), raw_body))?;
                    if depth == 0 {
                        if !text.trim().is_empty() {
                            return Err(PortalError::protocol("text outside the root element", raw_body));
                        }
                        continue;
                    }
                    append(capturing, &mut status, &mut message, &text);
                }
                Event::CData(data) => {
                    if depth == 0 {
                        return Err(PortalError::protocol("CDATA outside the root element", raw_body));
                    }
                    let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    append(capturing, &mut status, &mut message, &text);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !seen_root {
            return Err(PortalError::protocol("no root element", raw_body));
        }
        if depth != 0 {
            return Err(PortalError::protocol("unclosed element", raw_body));
        }

        Ok(LoginResult {
            status: status.unwrap_or_default().trim().to_string(),
            message: message.unwrap_or_default().trim().to_string(),
        })
    }
}

fn append(
    capturing: Option<Field>,
    status: &mut Option<String>,
    message: &mut Option<String>,
    text: &str,
) {
    let target = match capturing {
        Some(Field::Status) => status,
        Some(Field::Message) => message,
        None => return,
    };
    if let Some(value) = target.as_mut() {
        value.push_str(text);
    }
}
