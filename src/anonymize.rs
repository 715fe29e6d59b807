/// Mask the local part of an address so log lines do not carry the full
/// mailbox. The domain is kept, it is what operators usually need.
///
/// `"john.doe@example.com"` becomes `"j***@example.com"`. Input without an
/// `@` is masked entirely.
pub fn mask_email(email: &str) -> String {
    match email.rfind('@') {
        Some(at_pos) if at_pos > 0 => {
            let (local, domain) = email.split_at(at_pos);
            let first = local.chars().next().unwrap_or('*');
            format!("{first}***{domain}")
        }
        _ => "***".to_string(),
    }
}

/// Render an address for a log line, masked unless redaction is off.
pub fn loggable_email(email: &str, redact: bool) -> String {
    if redact {
        mask_email(email)
    } else {
        email.to_string()
    }
}
