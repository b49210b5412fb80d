//! Lexical extractors for the order flow: quantity tokens and contact
//! details. All functions are deterministic and side-effect free.

pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 10;

/// Contact details recovered from a free-form checkout message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactDetails {
    pub name: Option<String>,
    pub email: String,
}

/// First standalone 1-2 digit token in the message, clamped to `[1, 10]`.
/// Tokens are word-boundary delimited (alphanumerics and `_` are word
/// characters), so `order2` and `125 pesos` contribute no quantity.
/// No digit token at all defaults to 1.
pub fn extract_quantity(message: &str) -> u32 {
    message
        .split(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
        .filter(|token| !token.is_empty())
        .find(|token| token.len() <= 2 && token.bytes().all(|byte| byte.is_ascii_digit()))
        .and_then(|token| token.parse::<u32>().ok())
        .map(|quantity| quantity.clamp(MIN_QUANTITY, MAX_QUANTITY))
        .unwrap_or(MIN_QUANTITY)
}

/// First email-shaped substring plus a display name derived from the rest of
/// the message. Returns `None` when no email is present; callers treat that
/// as insufficient information and re-prompt.
pub fn parse_contact_details(message: &str) -> Option<ContactDetails> {
    let (start, end) = find_email(message)?;
    let email = message[start..end].to_string();

    let mut remainder = String::with_capacity(message.len());
    remainder.push_str(&message[..start]);
    remainder.push(' ');
    remainder.push_str(&message[end..]);

    let name = normalize_name(&remainder);
    Some(ContactDetails { name, email })
}

fn find_email(message: &str) -> Option<(usize, usize)> {
    let bytes = message.as_bytes();
    for (index, byte) in bytes.iter().enumerate() {
        if *byte != b'@' {
            continue;
        }
        if let Some(span) = email_span_at(bytes, index) {
            return Some(span);
        }
    }
    None
}

/// Expands an email match around the `@` at `at`: a non-empty local part of
/// `[A-Za-z0-9._%+-]`, then the longest domain of `[A-Za-z0-9.-]` that ends
/// in a dot followed by at least two letters.
fn email_span_at(bytes: &[u8], at: usize) -> Option<(usize, usize)> {
    let mut start = at;
    while start > 0 && is_local_byte(bytes[start - 1]) {
        start -= 1;
    }
    if start == at {
        return None;
    }

    let mut span_end = at + 1;
    while span_end < bytes.len() && is_domain_byte(bytes[span_end]) {
        span_end += 1;
    }

    let mut end = span_end;
    while end > at + 1 {
        let run = trailing_alpha_run(bytes, at + 1, end);
        if run >= 2 {
            let dot = end - run - 1;
            if dot > at + 1 && bytes[dot] == b'.' {
                return Some((start, end));
            }
        }
        end -= 1;
    }
    None
}

fn trailing_alpha_run(bytes: &[u8], floor: usize, end: usize) -> usize {
    let mut run = 0;
    while end - run > floor && bytes[end - run - 1].is_ascii_alphabetic() {
        run += 1;
    }
    run
}

fn is_local_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'%' | b'+' | b'-')
}

fn is_domain_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'-')
}

/// Collapses separator punctuation and whitespace, trims, and title-cases
/// what is left of the message once the email is removed.
fn normalize_name(remainder: &str) -> Option<String> {
    let collapsed = remainder
        .chars()
        .map(|ch| if matches!(ch, '-' | ':' | ',') { ' ' } else { ch })
        .collect::<String>();
    let squeezed = collapsed.split_whitespace().collect::<Vec<_>>().join(" ");
    if squeezed.is_empty() {
        return None;
    }
    Some(title_case(&squeezed))
}

fn title_case(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                output.extend(ch.to_uppercase());
            } else {
                output.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            output.push(ch);
            at_word_start = true;
        }
    }
    output
}
