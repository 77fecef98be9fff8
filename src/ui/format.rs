//! Display helpers shared by the profile and withdraw pages.

use serde::Serialize;

/// A labelled outbound link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub label: String,
    pub href: String,
}

/// `0x1234...abcd`: the first six and last four characters.
///
/// Strings of ten characters or fewer have nothing to elide and are
/// returned unchanged rather than sliced into overlapping halves.
pub fn shorten_addr(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

pub fn twitter_link(handle: &str) -> Link {
    Link {
        label: format!("@{}", handle),
        href: format!("https://twitter.com/{}", handle),
    }
}

pub fn domain_link(domain: &str) -> Link {
    Link {
        label: domain.to_string(),
        href: format!("https://{}", domain),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_addr() {
        assert_eq!(
            shorten_addr("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
            "0xf39F...2266"
        );
        assert_eq!(shorten_addr("0x1234"), "0x1234");
        assert_eq!(shorten_addr(""), "");
    }

    #[test]
    fn test_links() {
        let twitter = twitter_link("sourcecheck");
        assert_eq!(twitter.label, "@sourcecheck");
        assert_eq!(twitter.href, "https://twitter.com/sourcecheck");

        let domain = domain_link("sourcecheck.org");
        assert_eq!(domain.label, "sourcecheck.org");
        assert_eq!(domain.href, "https://sourcecheck.org");
    }
}
