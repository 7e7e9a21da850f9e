//! HTML pages

use html_escape::encode_text;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use pokedex_runtime::CardRecord;

/// Everything outside the RFC 3986 unreserved set
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Slug reserved for "no matching card"
pub const NOT_KNOWN: &str = "notknown";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        encode_text(title),
        body
    )
}

/// Upload form
pub fn home() -> String {
    layout(
        "Pokedex",
        "<h1>Pokedex</h1>\n\
         <p>Take a picture of a trading card and find out which one it is.</p>\n\
         <form action=\"/analyze\" method=\"post\" enctype=\"multipart/form-data\">\n\
         <input type=\"file\" name=\"file\" accept=\"image/*\" required>\n\
         <button type=\"submit\">Analyze</button>\n\
         </form>",
    )
}

/// Card detail page. `None` renders the empty variant.
pub fn card(card: Option<&CardRecord>) -> String {
    let Some(card) = card else {
        return layout(
            "Pokedex - card",
            "<h1>Card</h1>\n\
             <p>No card information available.</p>\n\
             <p><a href=\"/\">Try another card</a></p>",
        );
    };

    let mut rows = String::new();
    for (key, value) in &card.fields {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        rows.push_str(&format!(
            "<tr><th>{}</th><td>{}</td></tr>\n",
            encode_text(key),
            encode_text(&value)
        ));
    }

    let label = encode_component(&card.label);
    let body = format!(
        "<h1>{name}</h1>\n\
         <table>\n{rows}</table>\n\
         <p>Did we get it right?\n\
         <a href=\"/feedback?ans=correct&amp;name={label}\">Yes</a>\n\
         <a href=\"/feedback?ans=wrong&amp;name={label}\">No</a></p>\n\
         <p><a href=\"/\">Try another card</a></p>",
        name = encode_text(&card.name),
        rows = rows,
        label = label,
    );
    layout(&format!("Pokedex - {}", card.name), &body)
}

/// Page for predictions without a catalog entry
pub fn card_not_known() -> String {
    layout(
        "Pokedex - unknown card",
        "<h1>Unknown card</h1>\n\
         <p>We could not recognise this card.</p>\n\
         <p><a href=\"/\">Try another picture</a></p>",
    )
}

/// Percent-encode a value for use as a path segment or query value.
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, PATH_SEGMENT).to_string()
}

/// Undo [`encode_component`]. Invalid UTF-8 is replaced, not rejected.
pub fn decode_component(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}
