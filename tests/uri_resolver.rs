use byos::uri::{is_same_document_reference, relativize, resolve};
use byos::Uri;
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use rstest::rstest;

fn uri(s: &str) -> Uri {
    s.parse().unwrap()
}

#[rstest]
#[case("http://a/b/c/g", "g")]
#[case("http://a/b/g?y", "../g?y")]
#[case("http://a/b/c/d;p?q#f", "#f")]
#[case("http://a/b/c/d;p", "d;p")]
#[case("http://a/b/c/d;p?y", "?y")]
#[case("http://a/b/c/g/h/", "g/h/")]
#[case("http://a/", "../../")]
#[case("http://x/y", "//x/y")]
#[case("https://a/b/c", "https://a/b/c")]
fn relative_reference_resolves_to_target(
    #[case] target: &str,
    #[case] expected: &str,
) {
    let base = uri("http://a/b/c/d;p?q");
    let target = uri(target);
    let reference = relativize(&base, &target);
    assert_eq!(reference.to_string(), expected);
    assert_eq!(resolve(&base, &reference), target);
}

#[rstest]
#[case("#f", true)]
#[case("", true)]
#[case("d;p?q#g", true)]
#[case("?y", false)]
#[case("//a/b/c/d;p?q", true)]
#[case("http://a/b/c/e", false)]
fn same_document(#[case] reference: &str, #[case] expected: bool) {
    let base = uri("http://a/b/c/d;p?q");
    assert_eq!(
        is_same_document_reference(&uri(reference), Some(&base)),
        expected
    );
}

#[test]
fn resolve_then_display() {
    let base = uri("HTTP://user@Example.com:80/a/b/");
    let resolved = resolve(&base, &uri("../c/./d?x#y"));
    assert_eq!(resolved.to_string(), "http://user@example.com/a/c/d?x#y");
    assert_eq!(resolved.port(), None);
}

const SEGMENTS: &[&str] = &["a", "b", "c", "g", "d;p", "xy"];
const QUERIES: &[&str] = &["q", "y", "x=1"];

fn pick(g: &mut Gen, values: &[&str]) -> String {
    g.choose(values).unwrap().to_string()
}

/// Absolute path without dot segments or empty segments.
fn path(g: &mut Gen) -> String {
    let n = usize::arbitrary(g) % 4;
    if n == 0 {
        return String::from("/");
    }
    let segments: Vec<String> = (0..n).map(|_| pick(g, SEGMENTS)).collect();
    let slash = if bool::arbitrary(g) { "/" } else { "" };
    format!("/{}{}", segments.join("/"), slash)
}

fn query(g: &mut Gen) -> String {
    match bool::arbitrary(g) {
        true => format!("?{}", pick(g, QUERIES)),
        false => String::new(),
    }
}

#[derive(Clone, Debug)]
struct Base(String);

impl Arbitrary for Base {
    fn arbitrary(g: &mut Gen) -> Self {
        Base(format!("http://a{}{}", path(g), query(g)))
    }
}

#[derive(Clone, Debug)]
struct Target(String);

impl Arbitrary for Target {
    fn arbitrary(g: &mut Gen) -> Self {
        let host = pick(g, &["a", "b"]);
        let fragment = match bool::arbitrary(g) {
            true => format!("#{}", pick(g, &["f", "s"])),
            false => String::new(),
        };
        Target(format!("http://{}{}{}{}", host, path(g), query(g), fragment))
    }
}

#[quickcheck]
fn relativized_reference_resolves_to_target(base: Base, target: Target) {
    let base = uri(&base.0);
    let target = uri(&target.0);
    let reference = relativize(&base, &target);
    assert_eq!(resolve(&base, &reference), target, "via {}", reference);
}
