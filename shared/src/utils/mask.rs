//! Masking helpers so contact identifiers never reach the logs in full

/// Mask phone number for logging (show only last 4 characters)
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("***{}", tail)
}

/// Mask email for logging (first character of the local part and the domain)
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) => format!("{}***@{}", first, domain),
            None => format!("***@{}", domain),
        },
        None => mask_phone(email),
    }
}

/// Mask any contact identifier, choosing the email or phone form
pub fn mask_identifier(identifier: &str) -> String {
    if identifier.contains('@') {
        mask_email(identifier)
    } else {
        mask_phone(identifier)
    }
}
