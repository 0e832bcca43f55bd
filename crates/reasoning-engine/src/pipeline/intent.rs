use super::IntentSignal;
use event_bus::Intent;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TESTING_CUE: Regex = Regex::new(r"\b(?:describe|test|it)\(").unwrap();
    static ref REFACTORING_CUE: Regex =
        Regex::new(r"(?i)(?://|#)\s*(?:refactor|cleanup)\b").unwrap();
    static ref INTEGRATION_CUE: Regex = Regex::new(
        r"\bfetch\(|\baxios\.|\bhttp\.(?:get|request)\(|\brequests\.(?:get|post)\(|\breqwest::|\binvoke\(|\breadFile\(|\bread_file\("
    )
    .unwrap();
}

const CUES: [(&str, Intent, f32); 3] = [
    ("testing", Intent::Testing, 0.9),
    ("refactoring", Intent::Refactoring, 0.85),
    ("integration", Intent::Integration, 0.8),
];

fn cue(intent: Intent) -> &'static Regex {
    match intent {
        Intent::Testing => &TESTING_CUE,
        Intent::Refactoring => &REFACTORING_CUE,
        Intent::Integration => &INTEGRATION_CUE,
    }
}

/// The last `window_lines` lines of `content`, which is where the developer
/// is most likely typing.
fn tail(content: &str, window_lines: usize) -> String {
    let mut lines: Vec<&str> = content.lines().rev().take(window_lines).collect();
    lines.reverse();
    lines.join("\n")
}

/// One signal per intent whose cue appears in the tail of `content`.
pub fn detect(content: &str, window_lines: usize) -> Vec<IntentSignal> {
    let window = tail(content, window_lines);

    CUES.iter()
        .filter(|(_, intent, _)| cue(*intent).is_match(&window))
        .map(|&(name, intent, confidence)| {
            tracing::trace!("Intent cue matched: {}", name);
            IntentSignal { intent, confidence }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intents(content: &str) -> Vec<Intent> {
        detect(content, 10).into_iter().map(|s| s.intent).collect()
    }

    #[test]
    fn test_testing_cues() {
        let signals = detect("describe('adder', () => {\n  it('adds', () => {});\n});", 10);

        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].intent, Intent::Testing);
        assert_eq!(signals[0].confidence, 0.9);
        assert_eq!(intents("test(\"x\", fn)"), vec![Intent::Testing]);
    }

    #[test]
    fn test_identifiers_ending_in_cue_words_do_not_match() {
        assert!(intents("submit(form);\nlatest(items);\nrefetch(query);").is_empty());
    }

    #[test]
    fn test_refactoring_marker() {
        assert_eq!(
            intents("let a = 1;\n// Cleanup later"),
            vec![Intent::Refactoring]
        );

        let signals = detect("x = 1\n# cleanup: merge with y\n", 10);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].intent, Intent::Refactoring);
        assert_eq!(signals[0].confidence, 0.85);
        assert_eq!(intents("// Refactor: split"), vec![Intent::Refactoring]);
    }

    #[test]
    fn test_integration_cues() {
        for line in [
            "const r = await fetch(url);",
            "axios.get('/api');",
            "resp = requests.post(url, json=body)",
            "let body = reqwest::get(url).await?;",
            "const text = await invoke('read_file', { path });",
            "fs.readFile(path, cb);",
        ] {
            let signals = detect(line, 10);
            assert_eq!(signals.len(), 1, "{line}");
            assert_eq!(signals[0].intent, Intent::Integration);
            assert_eq!(signals[0].confidence, 0.8);
        }
    }

    #[test]
    fn test_only_the_tail_is_inspected() {
        let mut content = String::from("describe('old suite', () => {});\n");
        content.push_str(&"const x = 1;\n".repeat(10));

        assert!(intents(&content).is_empty());
        assert_eq!(detect(&content, 11).len(), 1);
    }

    #[test]
    fn test_multiple_intents_in_declared_order() {
        let content = "// cleanup\nit('loads', async () => {\n  await fetch('/x');\n});";

        assert_eq!(
            intents(content),
            vec![Intent::Testing, Intent::Refactoring, Intent::Integration]
        );
    }

    #[test]
    fn test_empty_content() {
        assert!(intents("").is_empty());
    }
}
