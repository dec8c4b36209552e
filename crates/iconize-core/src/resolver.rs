//! Rule resolution.
//!
//! Finds the first rule in a [`RuleSet`] that applies to a path. Matching
//! looks at the basename only; scope is checked whenever the entry kind is
//! known (see [`ResolveOptions::enforce_scope`]).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::rule::{basename, is_reserved_key, CompiledRule, CustomRule, RuleSet};
use crate::scope::EntryKind;

static EMOJI_SEQUENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[\p{Extended_Pictographic}\p{Regional_Indicator}\p{Emoji_Modifier}\x{200D}\x{FE0F}\x{20E3}0-9#*]+$",
    )
    .expect("emoji pattern is valid")
});

/// Decides whether an icon identifier is an emoji rather than an icon-pack name.
pub trait EmojiClassifier {
    fn is_emoji(&self, icon: &str) -> bool;
}

/// Emoji detection based on Unicode emoji properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeEmojiClassifier;

impl EmojiClassifier for UnicodeEmojiClassifier {
    fn is_emoji(&self, icon: &str) -> bool {
        !icon.is_ascii() && EMOJI_SEQUENCE.is_match(icon)
    }
}

impl<F> EmojiClassifier for F
where
    F: Fn(&str) -> bool,
{
    fn is_emoji(&self, icon: &str) -> bool {
        self(icon)
    }
}

/// Resolution behaviour switches.
#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions {
    /// Check rule scope against the entry kind in [`RuleResolver::resolve_entry`].
    pub enforce_scope: bool,
    /// Leave emoji-iconed rules out of path resolution.
    pub skip_emoji: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            enforce_scope: true,
            skip_emoji: true,
        }
    }
}

/// A resolved rule together with its priority position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    pub index: usize,
    pub rule: &'a CustomRule,
}

/// First-match-wins resolver over a compiled rule snapshot.
pub struct RuleResolver<'a> {
    rules: Vec<CompiledRule<'a>>,
    classifier: Box<dyn EmojiClassifier + 'a>,
    options: ResolveOptions,
}

impl<'a> RuleResolver<'a> {
    /// Compile `rules` once with default options and emoji detection.
    pub fn new(rules: &'a RuleSet) -> Self {
        Self {
            rules: rules.compile(),
            classifier: Box::new(UnicodeEmojiClassifier),
            options: ResolveOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_classifier(mut self, classifier: impl EmojiClassifier + 'a) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn options(&self) -> ResolveOptions {
        self.options
    }

    /// Resolve a bare path (entry kind unknown).
    ///
    /// Reserved keys never resolve. Only the basename pattern is tested.
    pub fn find_first_matching_rule(&self, path: &str) -> Option<RuleMatch<'a>> {
        self.scan(path, None)
    }

    /// Resolve a path whose entry kind is known.
    ///
    /// With `enforce_scope` off this is identical to
    /// [`find_first_matching_rule`](Self::find_first_matching_rule).
    pub fn resolve_entry(&self, path: &str, kind: EntryKind) -> Option<RuleMatch<'a>> {
        let kind = self.options.enforce_scope.then_some(kind);
        self.scan(path, kind)
    }

    fn scan(&self, path: &str, kind: Option<EntryKind>) -> Option<RuleMatch<'a>> {
        if is_reserved_key(path) {
            return None;
        }

        let name = basename(path);
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, compiled)| {
                !(self.options.skip_emoji && self.classifier.is_emoji(&compiled.rule.icon))
            })
            .find(|(_, compiled)| {
                compiled.pattern.matches(name)
                    && kind.map_or(true, |k| compiled.rule.scope.is_compatible(k))
            })
            .map(|(index, compiled)| RuleMatch {
                index,
                rule: compiled.rule,
            })
    }
}

/// Test a single rule against a path: basename pattern and scope must both hold.
pub fn matches(rule: &CustomRule, path: &str, kind: EntryKind) -> bool {
    rule.compile().matches(path, kind)
}

/// One-shot resolution of a bare path with default options.
pub fn find_first_matching_rule<'a>(rules: &'a RuleSet, path: &str) -> Option<&'a CustomRule> {
    RuleResolver::new(rules)
        .find_first_matching_rule(path)
        .map(|m| m.rule)
}
