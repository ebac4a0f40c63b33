//! # Subdomain-gateway URL parsing.
//!
//! Splits a subdomain-gateway URL such as `https://{cid}.ipfs.dweb.link/` into
//! its content identifier, protocol marker and parent domain by scanning
//! hostname labels **right to left** for the first label starting with `ipfs`
//! or `ipns`. The right-to-left scan keeps edge cases like
//! `docs.ipfs.tech.ipns.foo.localhost` correct: the *rightmost* marker wins.
//!
//! DNSLink names carrying dots cannot appear verbatim in a single DNS label, so
//! the subdomain gateway inlines them (`.` becomes `-`, a literal `-` becomes
//! `--`). When the detected protocol is `ipns` and the identifier looks
//! inlined, it is decoded back to its dotted form before being returned.

use url::Url;

/// Pieces of a subdomain-gateway URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts {
    /// Content identifier or (decoded) DNSLink name; `None` when no marker found.
    pub id: Option<String>,
    /// Detected protocol label (`"ipfs"` / `"ipns"`); `None` when no marker found.
    pub protocol: Option<String>,
    /// Labels right of the marker, or the whole input URL when no marker found.
    pub parent_domain: String,
}

/// Splits a URL's hostname into subdomain-gateway parts.
///
/// # Example
/// ```
/// use swgate::subdomain_parts;
///
/// let parts = subdomain_parts("https://bafybeib3bcis4mhshbmnmzkkwo7wmsjj.ipfs.dweb.link/").unwrap();
/// assert_eq!(parts.id.as_deref(), Some("bafybeib3bcis4mhshbmnmzkkwo7wmsjj"));
/// assert_eq!(parts.protocol.as_deref(), Some("ipfs"));
/// assert_eq!(parts.parent_domain, "dweb.link");
/// ```
pub fn subdomain_parts(url: &str) -> Result<UrlParts, url::ParseError> {
    let parsed = Url::parse(url)?;
    let hostname = parsed.host_str().ok_or(url::ParseError::EmptyHost)?;
    let labels: Vec<&str> = hostname.split('.').collect();

    for i in (0..labels.len()).rev() {
        if labels[i].starts_with("ipfs") || labels[i].starts_with("ipns") {
            let protocol = labels[i];
            let mut id = labels[..i].join(".");
            let parent_domain = labels[i + 1..].join(".");
            if protocol == "ipns" && is_inlined_dnslink(&id) {
                id = dnslink_label_decode(&id);
            }
            return Ok(UrlParts {
                id: Some(id),
                protocol: Some(protocol.to_string()),
                parent_domain,
            });
        }
    }

    Ok(UrlParts {
        id: None,
        protocol: None,
        parent_domain: url.to_string(),
    })
}

/// Whether a label looks like an inlined DNSLink name.
///
/// An inlined name carries at least one dash and no dots (the dots were the
/// thing being inlined away).
pub fn is_inlined_dnslink(label: &str) -> bool {
    label.contains('-') && !label.contains('.')
}

/// Decodes an inlined DNSLink label back to its dotted form.
///
/// `--` decodes to a literal `-`; a single `-` decodes to `.`.
///
/// # Example
/// ```
/// use swgate::dnslink_label_decode;
///
/// assert_eq!(dnslink_label_decode("en-wikipedia--on--ipfs-org"), "en.wikipedia-on-ipfs.org");
/// ```
pub fn dnslink_label_decode(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut chars = label.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '-' {
            if chars.peek() == Some(&'-') {
                chars.next();
                out.push('-');
            } else {
                out.push('.');
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Inlines a dotted DNSLink name into a single DNS label.
///
/// The inverse of [`dnslink_label_decode`]: `-` becomes `--`, `.` becomes `-`.
pub fn dnslink_label_encode(name: &str) -> String {
    name.replace('-', "--").replace('.', "-")
}
