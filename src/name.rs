//! Domain name helpers
//!
//! Names are kept as text. An absolute name always ends in a dot and an
//! origin is always absolute.

/// Makes a name absolute within `origin`
///
/// `@` stands for the origin itself. Names that already end in a dot are
/// returned unchanged.
pub fn qualify(name: &str, origin: &str) -> String {
    if name == "@" {
        return origin.to_owned();
    }
    if name.ends_with('.') {
        return name.to_owned();
    }
    if origin.is_empty() || origin == "." {
        return format!("{}.", name);
    }
    format!("{}.{}", name, origin)
}

/// Appends the trailing dot to a domain if it is missing
pub fn absolute(domain: &str) -> String {
    if domain.ends_with('.') {
        domain.to_owned()
    } else {
        format!("{}.", domain)
    }
}

/// Shortens an absolute hostname for output within `origin`
///
/// The origin itself becomes `@`, names below it lose the origin suffix and
/// anything else is left alone.
pub fn relative_to<'a>(hostname: &'a str, origin: &str) -> &'a str {
    if hostname == origin {
        return "@";
    }
    match hostname.strip_suffix(origin) {
        Some(rest) if !origin.is_empty() && rest.len() > 1 && rest.ends_with('.') => {
            &rest[..rest.len() - 1]
        }
        _ => hostname,
    }
}

#[cfg(test)]
mod test {
    use super::{absolute, qualify, relative_to};

    #[test]
    fn qualify_relative_names() {
        assert_eq!(qualify("@", "example.com."), "example.com.");
        assert_eq!(qualify("www", "example.com."), "www.example.com.");
        assert_eq!(qualify("a.b", "example.com."), "a.b.example.com.");
        assert_eq!(qualify("www", "."), "www.");
    }

    #[test]
    fn qualify_leaves_absolute_names_alone() {
        for origin in &["example.com.", "other.org.", ""] {
            assert_eq!(qualify("mail.example.com.", origin), "mail.example.com.");
            assert_eq!(qualify("external.org.", origin), "external.org.");
        }
    }

    #[test]
    fn absolute_adds_dot_once() {
        assert_eq!(absolute("example.com"), "example.com.");
        assert_eq!(absolute("example.com."), "example.com.");
    }

    #[test]
    fn relative_names_for_output() {
        assert_eq!(relative_to("example.com.", "example.com."), "@");
        assert_eq!(relative_to("www.example.com.", "example.com."), "www");
        assert_eq!(relative_to("a.b.example.com.", "example.com."), "a.b");
        assert_eq!(relative_to("external.org.", "example.com."), "external.org.");
        assert_eq!(relative_to("badexample.com.", "example.com."), "badexample.com.");
    }
}
