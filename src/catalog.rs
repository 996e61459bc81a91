//! The collations this crate ships, constructed once and looked up by name or MySQL ID.

use once_cell::sync::Lazy;

use crate::binary::BinaryCollation;
use crate::charset::Charset;
use crate::legacy::LegacyCollation;
use crate::options::{CollationOptions, Strength};
use crate::tailoring::{Reorder, Tailoring};
use crate::uca900::Uca900Collation;
use crate::weights::{DUCET_400, DUCET_900};
use crate::Collation;

//
// Static/const
//

static ES_0900: &str = include_str!("../data/tailoring/es_0900.txt");
static ES_TRAD_0900: &str = include_str!("../data/tailoring/es_trad_0900.txt");
static CS_0900: &str = include_str!("../data/tailoring/cs_0900.txt");
static DA_0900: &str = include_str!("../data/tailoring/da_0900.txt");
static SPANISH_0400: &str = include_str!("../data/tailoring/spanish_0400.txt");
static SPANISH2_0400: &str = include_str!("../data/tailoring/spanish2_0400.txt");

/// Cyrillic first, then Latin, Greek and Coptic. Together the rules permute `0x1C47..=0x1ED8`.
const RU_REORDER: [Reorder; 2] = [
    Reorder {
        from_min: 0x1E3C,
        from_max: 0x1ED8,
        to_min: 0x1C47,
    },
    Reorder {
        from_min: 0x1C47,
        from_max: 0x1E3B,
        to_min: 0x1CE4,
    },
];

/// Code points past the BMP weigh `REPLACEMENT_WEIGHT` in the `unicode_ci` family.
const LEGACY_MAX_CODEPOINT: u32 = 0xFFFF;

static CATALOG: Lazy<Vec<Collation>> = Lazy::new(|| {
    let es = || rules("es_0900", ES_0900);
    let es_trad = || es().then(rules("es_trad_0900", ES_TRAD_0900));
    let cs = || rules("cs_0900", CS_0900);
    let da = || rules("da_0900", DA_0900);
    let ru = || Tailoring {
        reorder: RU_REORDER.to_vec(),
        ..Tailoring::default()
    };

    vec![
        uca900("utf8mb4_0900_ai_ci", 255, Strength::Primary, Tailoring::default()),
        uca900("utf8mb4_0900_as_ci", 305, Strength::Secondary, Tailoring::default()),
        uca900("utf8mb4_0900_as_cs", 278, Strength::Tertiary, Tailoring::default()),
        uca900("utf8mb4_es_0900_ai_ci", 263, Strength::Primary, es()),
        uca900("utf8mb4_es_0900_as_cs", 286, Strength::Tertiary, es()),
        uca900("utf8mb4_es_trad_0900_ai_ci", 270, Strength::Primary, es_trad()),
        uca900("utf8mb4_es_trad_0900_as_cs", 293, Strength::Tertiary, es_trad()),
        uca900("utf8mb4_cs_0900_ai_ci", 266, Strength::Primary, cs()),
        uca900("utf8mb4_cs_0900_as_cs", 289, Strength::Tertiary, cs()),
        uca900("utf8mb4_da_0900_ai_ci", 267, Strength::Primary, da()),
        Collation::Uca900(Uca900Collation::new(
            "utf8mb4_da_0900_as_cs",
            290,
            CollationOptions {
                strength: Strength::Tertiary,
                upper_case_first: true,
            },
            &DUCET_900,
            da(),
        )),
        uca900("utf8mb4_ru_0900_ai_ci", 306, Strength::Primary, ru()),
        uca900("utf8mb4_ru_0900_as_cs", 307, Strength::Tertiary, ru()),
        Collation::Binary(BinaryCollation::new("utf8mb4_0900_bin", 309, Charset::Utf8mb4)),
        legacy("utf8mb4_unicode_ci", 224, Charset::Utf8mb4, Tailoring::default()),
        legacy("utf8mb3_unicode_ci", 192, Charset::Utf8mb3, Tailoring::default()),
        legacy(
            "utf8mb4_spanish_ci",
            231,
            Charset::Utf8mb4,
            rules("spanish_0400", SPANISH_0400),
        ),
        legacy(
            "utf8mb4_spanish2_ci",
            238,
            Charset::Utf8mb4,
            rules("spanish_0400", SPANISH_0400).then(rules("spanish2_0400", SPANISH2_0400)),
        ),
    ]
});

//
// Functions, public
//

/// Every collation, in catalog order.
pub fn all() -> &'static [Collation] {
    &CATALOG
}

pub fn from_name(name: &str) -> Option<&'static Collation> {
    CATALOG.iter().find(|c| c.name() == name)
}

pub fn from_id(id: u16) -> Option<&'static Collation> {
    CATALOG.iter().find(|c| c.id() == id)
}

//
// Functions, private
//

fn uca900(name: &'static str, id: u16, strength: Strength, tailoring: Tailoring) -> Collation {
    let options = CollationOptions {
        strength,
        upper_case_first: false,
    };

    Collation::Uca900(Uca900Collation::new(name, id, options, &DUCET_900, tailoring))
}

fn legacy(name: &'static str, id: u16, charset: Charset, tailoring: Tailoring) -> Collation {
    Collation::Legacy(LegacyCollation::new(
        name,
        id,
        charset,
        &DUCET_400,
        tailoring,
        LEGACY_MAX_CODEPOINT,
    ))
}

fn rules(name: &str, text: &str) -> Tailoring {
    Tailoring::from_rules(text, vec![])
        .unwrap_or_else(|err| panic!("embedded tailoring {name} is corrupt: {err}"))
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;
    use std::collections::HashSet;

    use super::*;
    use crate::options::WeightPadding;

    fn get(name: &str) -> &'static Collation {
        from_name(name).unwrap()
    }

    fn sorted(collation: &Collation, words: &[&'static str]) -> Vec<&'static str> {
        let mut words = words.to_vec();
        words.sort_by(|a, b| collation.collate(a.as_bytes(), b.as_bytes(), false));
        words
    }

    #[test]
    fn names_and_ids_are_unique() {
        let names: HashSet<_> = all().iter().map(Collation::name).collect();
        let ids: HashSet<_> = all().iter().map(Collation::id).collect();

        assert_eq!(names.len(), all().len());
        assert_eq!(ids.len(), all().len());
        assert_eq!(from_id(255).unwrap().name(), "utf8mb4_0900_ai_ci");
        assert_eq!(from_id(192).unwrap().charset(), Charset::Utf8mb3);
        assert!(from_id(309).unwrap().is_binary());
        assert!(from_name("latin1_swedish_ci").is_none());
    }

    #[test]
    fn spanish_n_tilde() {
        let es = get("utf8mb4_es_0900_ai_ci");
        let root = get("utf8mb4_0900_ai_ci");

        assert_eq!(sorted(es, &["nube", "ñu", "oso"]), ["nube", "ñu", "oso"]);
        assert_eq!(es.collate("nz".as_bytes(), "ña".as_bytes(), false), Ordering::Less);
        assert_eq!(root.collate("ña".as_bytes(), "nz".as_bytes(), false), Ordering::Less);
        assert_eq!(es.collate("n\u{303}".as_bytes(), "ñ".as_bytes(), false), Ordering::Equal);
    }

    #[test]
    fn traditional_spanish_ch_and_ll() {
        let es_trad = get("utf8mb4_es_trad_0900_ai_ci");

        assert_eq!(
            sorted(es_trad, &["dado", "chico", "cuna", "llave", "luz", "lz"]),
            ["cuna", "chico", "dado", "luz", "lz", "llave"]
        );
        assert_eq!(es_trad.collate(b"CH", b"ch", false), Ordering::Equal);
        assert_eq!(
            get("utf8mb4_es_trad_0900_as_cs").collate(b"ch", b"Ch", false),
            Ordering::Less
        );
    }

    #[test]
    fn czech_ch_follows_h() {
        let cs = get("utf8mb4_cs_0900_ai_ci");

        assert_eq!(
            sorted(cs, &["chata", "hrad", "cena", "čas", "ich"]),
            ["cena", "čas", "hrad", "chata", "ich"]
        );
        assert_eq!(cs.collate("c\u{30C}".as_bytes(), "č".as_bytes(), false), Ordering::Equal);
    }

    #[test]
    fn danish_closes_the_alphabet() {
        let da = get("utf8mb4_da_0900_ai_ci");
        let da_cs = get("utf8mb4_da_0900_as_cs");

        assert_eq!(
            sorted(da, &["aarhus", "zebra", "ørn", "æble", "abe"]),
            ["abe", "zebra", "æble", "ørn", "aarhus"]
        );
        assert_eq!(da_cs.collate(b"A", b"a", false), Ordering::Less);
        assert_eq!(get("utf8mb4_0900_as_cs").collate(b"A", b"a", false), Ordering::Greater);
    }

    #[test]
    fn danish_aa_follows_case_first() {
        let words = ["aa", "Aa", "aA", "AA"];

        assert_eq!(sorted(get("utf8mb4_da_0900_as_cs"), &words), ["AA", "Aa", "aA", "aa"]);
        assert_eq!(
            get("utf8mb4_da_0900_ai_ci").collate(b"AA", "å".as_bytes(), false),
            Ordering::Equal
        );
    }

    #[test]
    fn scripts_sort_between_latin_and_han() {
        for name in ["utf8mb4_0900_ai_ci", "utf8mb4_unicode_ci"] {
            let collation = get(name);

            for word in ["ζῆλος", "بيت", "קול", "दिल", "한글", "ひらがな"] {
                assert_eq!(
                    collation.collate(word.as_bytes(), "漢".as_bytes(), false),
                    Ordering::Less,
                    "{name} {word}"
                );
                assert_eq!(
                    collation.collate(word.as_bytes(), b"z", false),
                    Ordering::Greater,
                    "{name} {word}"
                );
            }
        }

        let mut key = Vec::new();
        get("utf8mb4_0900_ai_ci").weight_string(&mut key, "ζ".as_bytes(), WeightPadding::None);
        assert_eq!(key, [0x1D, 0xDC]);
    }

    #[test]
    fn russian_puts_cyrillic_first() {
        let ru = get("utf8mb4_ru_0900_ai_ci");
        let root = get("utf8mb4_0900_ai_ci");

        assert_eq!(ru.collate("я".as_bytes(), b"a", false), Ordering::Less);
        assert_eq!(root.collate("я".as_bytes(), b"a", false), Ordering::Greater);
        assert_eq!(ru.collate(b"z", "α".as_bytes(), false), Ordering::Less);
        assert_eq!(ru.collate(b"1", "а".as_bytes(), false), Ordering::Less);
    }

    #[test]
    fn legacy_spanish_variants() {
        let spanish = get("utf8mb4_spanish_ci");
        let spanish2 = get("utf8mb4_spanish2_ci");

        assert_eq!(spanish.collate("ña".as_bytes(), b"nz", false), Ordering::Greater);
        assert_eq!(spanish.collate(b"ch", b"cz", false), Ordering::Less);
        assert_eq!(spanish2.collate(b"ch", b"cz", false), Ordering::Greater);
        assert_eq!(spanish2.collate(b"llama", b"luz", false), Ordering::Greater);
    }
}
