use cdm_core::models::ground_truth::Treatment;
use cdm_evaluators::fuzzy::{DIAGNOSIS_MATCH_THRESHOLD, ratio};
use cdm_evaluators::keywords::{keyword_present, keyword_present_in_any};
use cdm_evaluators::procedures::{
    AltKeywords, alt_procedure_checker, normalize_icd_code, procedure_checker,
    procedure_icd_codes,
};
use proptest::prelude::*;

#[test]
fn denied_keyword_is_absent() {
    assert!(!keyword_present("patient denies fever", "fever"));
}

#[test]
fn plain_keyword_is_present() {
    assert!(keyword_present("patient has fever", "fever"));
}

#[test]
fn keyword_match_ignores_case() {
    assert!(keyword_present("Acute APPENDICITIS", "appendicitis"));
    assert!(!keyword_present("No Evidence Of appendicitis", "Appendicitis"));
}

#[test]
fn every_negation_cue_negates() {
    for text in [
        "no fever",
        "not fever",
        "without fever",
        "denies fever",
        "absence of fever",
        "no evidence of fever",
        "no signs of fever",
        "free of fever",
    ] {
        assert!(!keyword_present(text, "fever"), "{text}");
    }
}

#[test]
fn distant_negation_is_missed() {
    assert!(keyword_present("no clear evidence of fever after review", "fever"));
}

#[test]
fn absent_keyword_is_false() {
    assert!(!keyword_present("abdominal pain", "fever"));
}

#[test]
fn list_match_is_any_element() {
    let texts = ["no fever", "fever since yesterday"];
    assert!(keyword_present_in_any(&texts, "fever"));

    let texts = ["no fever", "denies fever"];
    assert!(!keyword_present_in_any(&texts, "fever"));

    let empty: [&str; 0] = [];
    assert!(!keyword_present_in_any(&empty, "fever"));
}

#[test]
fn keyword_with_regex_metacharacters_is_literal() {
    assert!(keyword_present("post-op (day 1)", "(day 1)"));
    assert!(!keyword_present("no (day 1)", "(day 1)"));
}

#[test]
fn procedure_checker_finds_any_candidate() {
    let plan = ["IV fluids", "Laparoscopic appendectomy"];
    assert!(procedure_checker(&["colectomy", "appendectomy"], &plan));
    assert!(!procedure_checker(&["colectomy"], &plan));
    assert!(!procedure_checker(&["appendectomy"], &["no appendectomy needed"]));
}

#[test]
fn alternate_keywords_must_share_a_sentence() {
    let alternatives = [AltKeywords::new("appendix", &["surgery"])];

    let split = ["The appendix was removed. Surgery was uneventful."];
    assert!(!alt_procedure_checker(&alternatives, &split));

    let combined = ["The appendix surgery was uneventful."];
    assert!(alt_procedure_checker(&alternatives, &combined));
}

#[test]
fn alternate_keywords_respect_negation() {
    let alternatives = [AltKeywords::new("gallbladder", &["removal"])];
    assert!(!alt_procedure_checker(
        &alternatives,
        &["gallbladder without removal"]
    ));
    assert!(alt_procedure_checker(&alternatives, &["gallbladder removal"]));
}

#[test]
fn matching_modifier_returns_first_hit() {
    let alt = AltKeywords::new("appendix", &["necros", "perf"]);
    assert_eq!(alt.matching_modifier("perforated appendix"), Some("perf"));
    assert_eq!(alt.matching_modifier("perforated colon"), None);
}

#[test]
fn icd_codes_are_normalised() {
    assert_eq!(normalize_icd_code(" 47.01 "), "4701");
    assert_eq!(normalize_icd_code("0dtj0zz"), "0DTJ0ZZ");

    let treatments = vec![
        Treatment::coded("Appendectomy", "0dtj0zz"),
        Treatment::free_text("IV fluids"),
        Treatment::coded("Lap appendectomy", "47.01"),
    ];
    let codes = procedure_icd_codes(&treatments);
    assert_eq!(
        codes.into_iter().collect::<Vec<_>>(),
        vec!["0DTJ0ZZ".to_string(), "4701".to_string()]
    );
}

#[test]
fn one_typo_passes_the_fuzzy_threshold() {
    assert!(ratio("apendicitis", "appendicitis") > DIAGNOSIS_MATCH_THRESHOLD);
}

#[test]
fn unrelated_word_fails_the_fuzzy_threshold() {
    assert!(ratio("cholangitis", "appendicitis") <= DIAGNOSIS_MATCH_THRESHOLD);
    assert!(ratio("gastroenteritis", "appendicitis") <= DIAGNOSIS_MATCH_THRESHOLD);
}

#[test]
fn fuzzy_ratio_edge_cases() {
    assert_eq!(ratio("", ""), 100);
    assert_eq!(ratio("abc", ""), 0);
    assert_eq!(ratio("appendicitis", "appendicitis"), 100);
}

proptest! {
    #[test]
    fn ratio_is_symmetric(a in "[a-z]{0,16}", b in "[a-z]{0,16}") {
        prop_assert_eq!(ratio(&a, &b), ratio(&b, &a));
    }

    #[test]
    fn ratio_is_bounded(a in ".{0,16}", b in ".{0,16}") {
        prop_assert!(ratio(&a, &b) <= 100);
    }

    #[test]
    fn ratio_of_identical_strings_is_100(a in ".{0,24}") {
        prop_assert_eq!(ratio(&a, &a), 100);
    }

    #[test]
    fn denied_word_is_never_present(kw in "[a-z]{3,12}") {
        let text = format!("patient denies {kw}");
        prop_assert!(!keyword_present(&text, &kw));
    }

    #[test]
    fn affirmed_word_is_present(kw in "[a-z]{3,12}") {
        let text = format!("exam shows {kw}");
        prop_assert!(keyword_present(&text, &kw));
    }

    #[test]
    fn matching_is_case_insensitive(text in "[a-z ]{0,40}", kw in "[a-z]{2,6}") {
        prop_assert_eq!(
            keyword_present(&text.to_uppercase(), &kw),
            keyword_present(&text, &kw)
        );
    }
}
