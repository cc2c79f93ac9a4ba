use url::{Host, Url};

/// Registrable domain of a URL, used to group probes
///
/// `https://api.example.co.uk/x` gives `example.co.uk`. IP hosts are returned
/// as-is and hosts that have no registrable part under the public suffix list
/// (`localhost`) fall back to the full host. Unparsable URLs give an empty
/// string.
pub fn extract_domain(url: &str) -> String {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return String::new();
    };

    match parsed.host() {
        Some(Host::Domain(host)) => {
            let host = host.trim_end_matches('.');
            psl::domain_str(host).unwrap_or(host).to_string()
        }
        Some(Host::Ipv4(ip)) => ip.to_string(),
        Some(Host::Ipv6(ip)) => ip.to_string(),
        None => String::new(),
    }
}
