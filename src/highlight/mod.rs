use std::sync::LazyLock;

use regex::Regex;

/// Display class for one character of a code snippet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SyntaxClass {
    #[default]
    Text,
    Keyword,
    Type,
    Number,
    Function,
    String,
    Comment,
}

/// Word boundaries are ASCII: any non-ASCII char counts as a non-word char.
const KEYWORDS: &str = r"(?-u:\b)(int|void|char|bool|boolean|byte|short|long|float|double|unsigned|signed|struct|class|interface|enum|if|else|while|do|for|return|break|continue|switch|case|default|goto|try|catch|throw|throws|finally|new|delete|public|private|protected|static|final|const|volatile|virtual|abstract|native|synchronized|transient|friend|this|super|sizeof|true|false|null|nullptr|auto|namespace|package|import|using|template|typename|extends|implements)(?-u:\b)";

const TYPES: &str = r"(?-u:\b)(Node|TreeNode|ListNode|TrieNode|vector|string|String|map|set|unordered_map|unordered_set|queue|stack|deque|priority_queue|pair|list|List|ArrayList|LinkedList|HashMap|HashSet|System|Integer|Character|Boolean)(?-u:\b)";

const NUMBERS: &str = r"(?-u:\b)[0-9]+(\.[0-9]+)?(?-u:\b)";

/// Identifier directly followed by `(`; only the identifier is coloured.
const FUNCTIONS: &str = r"(?-u:\b)([A-Za-z_][A-Za-z0-9_]*)\(";

const STRINGS: &str = r#""([^"\\]*(\\.[^"\\]*)*)""#;

const COMMENTS: &str = r"//.*";

struct Sweep {
    regex: Regex,
    /// Capture group whose span is coloured; 0 is the whole match.
    group: usize,
    class: SyntaxClass,
}

/// Sweeps in application order. Later sweeps overwrite earlier ones.
static SWEEPS: LazyLock<Vec<Sweep>> = LazyLock::new(|| {
    [
        (KEYWORDS, 0, SyntaxClass::Keyword),
        (TYPES, 0, SyntaxClass::Type),
        (NUMBERS, 0, SyntaxClass::Number),
        (FUNCTIONS, 1, SyntaxClass::Function),
        (STRINGS, 0, SyntaxClass::String),
        (COMMENTS, 0, SyntaxClass::Comment),
    ]
    .into_iter()
    .map(|(pattern, group, class)| Sweep {
        regex: Regex::new(pattern).expect("built-in highlight pattern"),
        group,
        class,
    })
    .collect()
});

/// Classify every character of `code`. The result has one entry per `char`.
pub fn syntax_map(code: &str) -> Vec<SyntaxClass> {
    // Regex spans are byte offsets; index `b` holds the char index at byte `b`.
    let mut char_at = vec![0usize; code.len() + 1];
    let mut count = 0;
    for (byte, _) in code.char_indices() {
        char_at[byte] = count;
        count += 1;
    }
    char_at[code.len()] = count;

    let mut map = vec![SyntaxClass::Text; count];
    for sweep in SWEEPS.iter() {
        for caps in sweep.regex.captures_iter(code) {
            if let Some(m) = caps.get(sweep.group) {
                map[char_at[m.start()]..char_at[m.end()]].fill(sweep.class);
            }
        }
    }
    map
}

/// The flat map split per line of `code`, newline entries dropped.
pub fn syntax_lines(code: &str) -> Vec<Vec<SyntaxClass>> {
    let map = syntax_map(code);
    let mut lines = Vec::new();
    let mut offset = 0;
    for line in code.split('\n') {
        let len = line.chars().count();
        lines.push(map[offset..offset + len].to_vec());
        offset += len + 1;
    }
    lines
}
