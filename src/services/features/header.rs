/// `Authorization: <scheme> <token>` split on a single space.
///
/// The scheme is carried but not checked; any scheme is accepted.
#[derive(Debug, PartialEq, Eq)]
pub struct Credentials<'a> {
    pub scheme: &'a str,
    pub token: &'a str,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum MalformedHeader {
    #[error("expected `<scheme> <token>`, got {0} part(s)")]
    PartCount(usize),
    #[error("empty token")]
    EmptyToken,
}

pub fn parse_authorization(value: &str) -> Result<Credentials<'_>, MalformedHeader> {
    let parts: Vec<&str> = value.split(' ').collect();

    let [scheme, token] = parts.as_slice() else {
        return Err(MalformedHeader::PartCount(parts.len()));
    };

    if token.is_empty() {
        return Err(MalformedHeader::EmptyToken);
    }

    Ok(Credentials {
        scheme: *scheme,
        token: *token,
    })
}
