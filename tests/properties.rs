use std::cmp::Ordering;

use mysql_uca::{catalog, Collation, WeightPadding};

const SAMPLES: &[&str] = &[
    "",
    " ",
    "!",
    "1",
    "a",
    "A",
    "a ",
    "a\t",
    "ab",
    "Ab",
    "AB",
    "abc",
    "b",
    "z",
    "é",
    "e\u{301}",
    "ß",
    "ss",
    "chico",
    "cuna",
    "Chico",
    "llave",
    "luz",
    "ñu",
    "n\u{303}u",
    "nu",
    "aarhus",
    "æble",
    "ørn",
    "čas",
    "c\u{30C}as",
    "я",
    "ё",
    "й",
    "и\u{306}",
    "α",
    "漢字",
    "😀",
];

/// Inputs with many collation elements per byte.
const DENSE: &[&str] = &["\u{FDFA}a", "\u{337F}\u{321D}xy", "ßß", "ǆǅ", "\u{FB03}b", "한글"];

/// Weight string capacity that fits any of `inputs`.
fn capacity(collation: &Collation, inputs: &[&str]) -> usize {
    inputs
        .iter()
        .map(|s| match collation {
            Collation::Uca900(c) => c.weight_string_len(s.chars().count() * 4),
            _ => collation.weight_string_len(s.len()),
        })
        .max()
        .unwrap_or(0)
}

fn padded(collation: &Collation, src: &str, capacity: usize) -> Vec<u8> {
    let mut dst = Vec::with_capacity(capacity);
    collation.weight_string(&mut dst, src.as_bytes(), WeightPadding::ToCapacity);
    dst
}

fn pairs() -> impl Iterator<Item = (&'static str, &'static str)> {
    SAMPLES
        .iter()
        .flat_map(|&a| SAMPLES.iter().map(move |&b| (a, b)))
}

#[test]
fn deterministic() {
    for collation in catalog::all() {
        for s in SAMPLES {
            let mut first = Vec::new();
            let mut second = Vec::new();
            collation.weight_string(&mut first, s.as_bytes(), WeightPadding::None);
            collation.weight_string(&mut second, s.as_bytes(), WeightPadding::None);

            assert_eq!(first, second, "{} {s:?}", collation.name());
        }

        for (a, b) in pairs() {
            assert_eq!(
                collation.collate(a.as_bytes(), b.as_bytes(), false),
                collation.collate(a.as_bytes(), b.as_bytes(), false)
            );
        }
    }
}

#[test]
fn reflexive_and_antisymmetric() {
    for collation in catalog::all() {
        for s in SAMPLES {
            assert_eq!(
                collation.collate(s.as_bytes(), s.as_bytes(), false),
                Ordering::Equal,
                "{} {s:?}",
                collation.name()
            );
        }

        for (a, b) in pairs() {
            assert_eq!(
                collation.collate(a.as_bytes(), b.as_bytes(), false),
                collation.collate(b.as_bytes(), a.as_bytes(), false).reverse(),
                "{} {a:?} {b:?}",
                collation.name()
            );
        }
    }
}

#[test]
fn weight_strings_agree_with_collate() {
    for collation in catalog::all() {
        for (a, b) in pairs() {
            let capacity = capacity(collation, &[a, b]);
            let key_a = padded(collation, a, capacity);
            let key_b = padded(collation, b, capacity);

            assert_eq!(
                key_a.cmp(&key_b),
                collation.collate(a.as_bytes(), b.as_bytes(), false),
                "{} {a:?} {b:?}",
                collation.name()
            );
        }
    }
}

#[test]
fn ignorable_suffix_is_a_prefix_match() {
    for collation in catalog::all() {
        for s in SAMPLES {
            let longer = format!("{s}\u{1}\u{2}");

            assert_ne!(
                collation.collate(s.as_bytes(), longer.as_bytes(), true),
                Ordering::Greater,
                "{} {s:?}",
                collation.name()
            );
        }
    }
}

#[test]
fn length_bound_holds() {
    for collation in catalog::all() {
        for s in SAMPLES {
            let bound = capacity(collation, &[s]);
            let mut dst = Vec::with_capacity(bound);
            collation.weight_string(&mut dst, s.as_bytes(), WeightPadding::None);

            assert!(dst.len() <= bound, "{} {s:?}", collation.name());
        }

        for s in SAMPLES.iter().chain(DENSE) {
            let aligned = format!("{s}{}", " ".repeat((4 - s.len() % 4) % 4));
            let bound = collation.weight_string_len(aligned.len());
            let mut dst = Vec::with_capacity(bound);
            collation.weight_string(&mut dst, aligned.as_bytes(), WeightPadding::None);

            assert!(dst.len() <= bound, "{} {aligned:?}", collation.name());
        }
    }
}

#[test]
fn padding_is_idempotent() {
    for collation in catalog::all() {
        for s in SAMPLES {
            let capacity = capacity(collation, &[s]);
            let mut dst = Vec::with_capacity(capacity);

            collation.weight_string(&mut dst, s.as_bytes(), WeightPadding::ToCapacity);
            let first = dst.clone();

            dst.clear();
            collation.weight_string(&mut dst, s.as_bytes(), WeightPadding::ToCapacity);

            assert_eq!(dst, first, "{} {s:?}", collation.name());
            assert_eq!(dst.len(), capacity);
        }
    }
}

#[test]
fn case_depends_on_strength() {
    let ai_ci = catalog::from_name("utf8mb4_0900_ai_ci").unwrap();
    let as_cs = catalog::from_name("utf8mb4_0900_as_cs").unwrap();

    assert_eq!(ai_ci.collate(b"a", b"A", false), Ordering::Equal);
    assert_ne!(as_cs.collate(b"a", b"A", false), Ordering::Equal);
}

#[test]
fn empty_input_pads_with_zeros() {
    for name in ["utf8mb4_0900_ai_ci", "utf8mb4_0900_as_cs", "utf8mb4_0900_bin"] {
        let collation = catalog::from_name(name).unwrap();
        let mut dst = Vec::with_capacity(8);

        collation.weight_string(&mut dst, b"", WeightPadding::ToCapacity);

        assert_eq!(dst, [0; 8], "{name}");
    }
}

#[test]
fn legacy_pads_to_codepoints() {
    let collation = catalog::from_name("utf8mb4_unicode_ci").unwrap();

    let mut short = Vec::new();
    collation.weight_string(&mut short, "añ".as_bytes(), WeightPadding::Codepoints(5));
    let mut spaced = Vec::new();
    collation.weight_string(&mut spaced, "añ   ".as_bytes(), WeightPadding::None);

    assert_eq!(short, spaced);
    assert_eq!(collation.collate("añ".as_bytes(), "añ   ".as_bytes(), false), Ordering::Equal);
}

#[test]
#[should_panic(expected = "multiple of 4")]
fn misaligned_length_is_fatal() {
    catalog::from_name("utf8mb4_0900_ai_ci")
        .unwrap()
        .weight_string_len(3);
}
