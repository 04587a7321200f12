//! XML helpers for the translator API.
//!
//! The HTTP API speaks WCF DataContract XML: scalar results come back as a
//! single `<string>` element, lists as `<ArrayOfstring>` / `<ArrayOfint>`,
//! and batch translation as `<ArrayOfTranslateArrayResponse>`.

use quick_xml::escape::escape;
use quick_xml::events::{BytesText, Event};
use quick_xml::Reader;

use crate::errors::{TranslatorError, TranslatorResult};
use crate::types::TranslateOptions;

/// Namespace of serialized primitive arrays.
pub const ARRAYS_NAMESPACE: &str = "http://schemas.microsoft.com/2003/10/Serialization/Arrays";

/// Namespace of the V2 service data contracts.
pub const SERVICE_NAMESPACE: &str =
    "http://schemas.datacontract.org/2004/07/Microsoft.MT.Web.Service.V2";

/// Parses a single `<string>` result (Translate, Detect).
pub fn parse_string(xml: &str) -> TranslatorResult<String> {
    collect_elements(xml, "string", "string")?
        .into_iter()
        .next()
        .ok_or_else(|| TranslatorError::xml("Missing <string> element"))
}

/// Parses an `<ArrayOfstring>` result.
pub fn parse_string_array(xml: &str) -> TranslatorResult<Vec<String>> {
    collect_elements(xml, "ArrayOfstring", "string")
}

/// Parses an `<ArrayOfint>` result (BreakSentences).
pub fn parse_int_array(xml: &str) -> TranslatorResult<Vec<u32>> {
    collect_elements(xml, "ArrayOfint", "int")?
        .into_iter()
        .map(|value| {
            value
                .trim()
                .parse::<u32>()
                .map_err(|_| TranslatorError::xml(format!("Invalid <int> value: {}", value)))
        })
        .collect()
}

/// Parses the translated texts of a TranslateArray result, in order.
pub fn parse_translate_array(xml: &str) -> TranslatorResult<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut results = Vec::new();
    let mut seen_root = false;
    let mut in_item = false;
    let mut field: Option<String> = None;
    let mut buf = String::new();
    let mut translated: Option<String> = None;
    let mut error: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = local_name(e.local_name().as_ref());
                if !seen_root {
                    check_root(&name, "ArrayOfTranslateArrayResponse")?;
                    seen_root = true;
                    continue;
                }
                match name.as_str() {
                    "TranslateArrayResponse" => {
                        in_item = true;
                        translated = None;
                        error = None;
                    }
                    "TranslatedText" | "Error" if in_item => {
                        field = Some(name.clone());
                        buf.clear();
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                let name = local_name(e.local_name().as_ref());
                if !seen_root {
                    check_root(&name, "ArrayOfTranslateArrayResponse")?;
                    seen_root = true;
                    continue;
                }
                if in_item && name == "TranslatedText" {
                    translated = Some(String::new());
                }
            }
            Event::Text(e) => {
                if field.is_some() {
                    buf.push_str(&text_content(&e)?);
                }
            }
            Event::CData(e) => {
                if field.is_some() {
                    buf.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(e) => {
                let name = local_name(e.local_name().as_ref());
                match name.as_str() {
                    "TranslatedText" if field.as_deref() == Some("TranslatedText") => {
                        translated = Some(std::mem::take(&mut buf));
                        field = None;
                    }
                    "Error" if field.as_deref() == Some("Error") => {
                        error = Some(std::mem::take(&mut buf));
                        field = None;
                    }
                    "TranslateArrayResponse" if in_item => {
                        in_item = false;
                        if let Some(message) = error.take().filter(|m| !m.trim().is_empty()) {
                            return Err(TranslatorError::UnexpectedResponse {
                                message: format!(
                                    "Translation {} failed: {}",
                                    results.len(),
                                    message
                                ),
                            });
                        }
                        let text = translated.take().ok_or_else(|| {
                            TranslatorError::xml("TranslateArrayResponse without <TranslatedText>")
                        })?;
                        results.push(text);
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(TranslatorError::xml("Empty XML document"));
    }

    Ok(results)
}

/// Builds an `<ArrayOfstring>` request body.
pub fn string_array_body<S: AsRef<str>>(items: &[S]) -> String {
    let mut body = format!(
        "<ArrayOfstring xmlns=\"{}\" xmlns:i=\"http://www.w3.org/2001/XMLSchema-instance\">",
        ARRAYS_NAMESPACE
    );
    for item in items {
        body.push_str("<string>");
        body.push_str(&escape(item.as_ref()));
        body.push_str("</string>");
    }
    body.push_str("</ArrayOfstring>");
    body
}

/// Builds a `<TranslateArrayRequest>` body.
///
/// Data contract members must appear in alphabetical order.
pub fn translate_array_body<S: AsRef<str>>(
    texts: &[S],
    to: &str,
    from: Option<&str>,
    options: &TranslateOptions,
) -> String {
    let mut body = String::from("<TranslateArrayRequest><AppId />");

    if let Some(from) = from {
        body.push_str(&format!("<From>{}</From>", escape(from)));
    }

    body.push_str("<Options>");
    if let Some(category) = &options.category {
        body.push_str(&format!(
            "<Category xmlns=\"{}\">{}</Category>",
            SERVICE_NAMESPACE,
            escape(category.as_str())
        ));
    }
    body.push_str(&format!(
        "<ContentType xmlns=\"{}\">{}</ContentType>",
        SERVICE_NAMESPACE,
        options.content_type.as_str()
    ));
    for empty in ["ReservedFlags", "State", "Uri", "User"] {
        body.push_str(&format!("<{} xmlns=\"{}\" />", empty, SERVICE_NAMESPACE));
    }
    body.push_str("</Options>");

    body.push_str("<Texts>");
    for text in texts {
        body.push_str(&format!(
            "<string xmlns=\"{}\">{}</string>",
            ARRAYS_NAMESPACE,
            escape(text.as_ref())
        ));
    }
    body.push_str("</Texts>");

    body.push_str(&format!("<To>{}</To></TranslateArrayRequest>", escape(to)));
    body
}

/// Collects the text of every `item` element under a `root` element.
fn collect_elements(xml: &str, root: &str, item: &str) -> TranslatorResult<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut items = Vec::new();
    let mut current: Option<String> = None;
    let mut seen_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = local_name(e.local_name().as_ref());
                if !seen_root {
                    check_root(&name, root)?;
                    seen_root = true;
                    if root != item {
                        continue;
                    }
                }
                if name == item {
                    current = Some(String::new());
                }
            }
            Event::Empty(e) => {
                let name = local_name(e.local_name().as_ref());
                if !seen_root {
                    check_root(&name, root)?;
                    seen_root = true;
                    if root != item {
                        continue;
                    }
                }
                if name == item {
                    items.push(String::new());
                }
            }
            Event::Text(e) => {
                if let Some(text) = current.as_mut() {
                    text.push_str(&text_content(&e)?);
                }
            }
            Event::CData(e) => {
                if let Some(text) = current.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(e) => {
                if local_name(e.local_name().as_ref()) == item {
                    if let Some(text) = current.take() {
                        items.push(text);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(TranslatorError::xml("Empty XML document"));
    }

    Ok(items)
}

fn text_content(text: &BytesText<'_>) -> TranslatorResult<String> {
    text.unescape()
        .map(|cow| cow.into_owned())
        .map_err(|err| TranslatorError::xml(err.to_string()))
}

fn local_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

fn check_root(found: &str, expected: &str) -> TranslatorResult<()> {
    if found == expected {
        Ok(())
    } else {
        Err(TranslatorError::xml(format!(
            "Expected <{}> root element, found <{}>",
            expected, found
        )))
    }
}
