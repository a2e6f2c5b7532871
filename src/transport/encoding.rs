use url::form_urlencoded;

/// Percent-encode a query name or value the way the Dysms signing scheme expects.
///
/// Starts from `application/x-www-form-urlencoded` escaping, then rewrites the three spots
/// where it differs from RFC 3986: space becomes `%20`, `*` becomes `%2A`, `~` stays literal.
pub fn percent_encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
        .replace('*', "%2A")
        .replace("%7E", "~")
}
