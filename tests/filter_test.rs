use epitaph::filter::{FilterRules, InputFilter, DEFAULT_RULES};

fn default_filter() -> InputFilter {
    InputFilter::new(FilterRules::default()).unwrap()
}

#[test]
fn test_clean_input_is_unchanged() {
    let filter = default_filter();
    for input in ["{{ 7*7 }}", "Rest in peace", "{{ user.username|upper }}", ""] {
        assert!(filter.is_clean(input));
        assert_eq!(filter.filter(input), input);
    }
}

#[test]
fn test_every_rule_is_removed_in_any_case() {
    let filter = default_filter();
    for rule in DEFAULT_RULES {
        assert_eq!(filter.filter(rule), "", "rule {rule}");
        assert_eq!(filter.filter(&rule.to_uppercase()), "", "rule {rule}");

        let mixed: String = rule
            .chars()
            .enumerate()
            .map(|(i, c)| match i % 2 {
                0 => c.to_ascii_uppercase(),
                _ => c,
            })
            .collect();
        assert_eq!(filter.filter(&mixed), "", "rule {mixed}");
    }
}

#[test]
fn test_filtering_is_idempotent_on_clean_output() {
    let filter = default_filter();
    let once = filter.filter("{{ self.__class__.__mro__ }} {% if x %}");
    assert!(filter.is_clean(&once));
    assert_eq!(filter.filter(&once), once);
}

#[test]
fn test_adjacent_tokens_each_removed_once() {
    let filter = default_filter();
    assert_eq!(filter.filter("{{ self.__class__ }}"), "{{ . }}");
    assert_eq!(filter.filter("SelfClassMRO"), "");
    assert_eq!(filter.filter("{%%}"), "");
}

#[test]
fn test_reassembled_tokens_survive_single_pass() {
    let filter = default_filter();

    let out = filter.filter("{{ se__lf }}");
    assert_eq!(out, "{{ self }}");
    assert!(!filter.is_clean(&out));

    let out = filter.filter("{__% for o in theme.ornaments %__}");
    assert_eq!(out, "{% for o in theme.ornaments %}");

    assert_eq!(filter.filter("cla_mro_ss"), "cla__ss");
}

#[test]
fn test_filter_is_deterministic() {
    let filter = default_filter();
    let input = "{{ request.application.__globals__.__builtins__ }}";
    assert_eq!(filter.filter(input), filter.filter(input));
    assert_eq!(filter.filter(input), "{{ .application.. }}");
}

#[test]
fn test_custom_rules() {
    let filter = InputFilter::new(FilterRules::new(["decoys"])).unwrap();
    assert_eq!(filter.filter("{{ DECOYS.build }}"), "{{ .build }}");
    assert_eq!(filter.filter("{{ self }}"), "{{ self }}");
}
