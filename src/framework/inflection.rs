//! English plural/singular inflection driven by rule tables.
//!
//! Resolution order for a word: uncountables, then the irregular pairs, then the
//! ordered regex rules (the last rule in a table has the highest priority).
//! A word that is already in the target form comes back unchanged, so
//! `plural("books") == "books"` and `singular("book") == "book"`.
//!
//! Rules rewrite only the suffix they match and take its casing from that
//! suffix, so `plural("bookShelf") == "bookShelves"`.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

struct Inflector {
    plural_rules: Vec<Rule>,
    singular_rules: Vec<Rule>,
    irregular_plurals: HashMap<&'static str, &'static str>,
    irregular_singles: HashMap<&'static str, &'static str>,
    uncountable_words: Vec<&'static str>,
    uncountable_patterns: Vec<Regex>,
}

const PLURAL_RULES: &[(&str, &str)] = &[
    (r"s?$", "s"),
    (r"[^\x00-\x7F]$", "${0}"),
    (r"([^aeiou]ese)$", "${1}"),
    (r"(ax|test)is$", "${1}es"),
    (r"(alias|[^aou]us|t[lm]as|gas|ris)$", "${1}es"),
    (r"(e[mn]u)s?$", "${1}s"),
    (r"([^l]ias|[aeiou]las|[ejzr]as|[iu]am)$", "${1}"),
    (
        r"(alumn|syllab|vir|radi|nucle|fung|cact|stimul|termin|bacill|foc|uter|loc|strat)(?:us|i)$",
        "${1}i",
    ),
    (r"(alumn|alg|vertebr)(?:a|ae)$", "${1}ae"),
    (r"(seraph|cherub)(?:im)?$", "${1}im"),
    (r"(her|at|gr)o$", "${1}oes"),
    (
        r"(agend|addend|millenni|dat|extrem|bacteri|desiderat|strat|candelabr|errat|ov|symposi|curricul|automat|quor)(?:a|um)$",
        "${1}a",
    ),
    (
        r"(apheli|hyperbat|periheli|asyndet|noumen|phenomen|criteri|organ|prolegomen|hedr|automat)(?:a|on)$",
        "${1}a",
    ),
    (r"sis$", "ses"),
    (r"(?:(kni|wi|li)fe|(ar|l|ea|eo|oa|hoo)f)$", "${1}${2}ves"),
    (r"([^aeiouy]|qu)y$", "${1}ies"),
    (r"([^ch][ieo][ln])ey$", "${1}ies"),
    (r"(x|ch|ss|sh|zz)$", "${1}es"),
    (r"(matr|cod|mur|sil|vert|ind|append)(?:ix|ex)$", "${1}ices"),
    (r"\b((?:tit)?m|l)(?:ice|ouse)$", "${1}ice"),
    (r"(pe)(?:rson|ople)$", "${1}ople"),
    (r"(child)(?:ren)?$", "${1}ren"),
    (r"eaux$", "${0}"),
    (r"m[ae]n$", "men"),
];

const SINGULAR_RULES: &[(&str, &str)] = &[
    (r"s$", ""),
    (r"(ss)$", "${1}"),
    (
        r"(wi|kni|(?:after|half|high|low|mid|non|night|[^\w]|^)li)ves$",
        "${1}fe",
    ),
    (r"(ar|(?:wo|[ae])l|[eo][ao])ves$", "${1}f"),
    (r"ies$", "y"),
    (
        r"(dg|ss|ois|lk|ok|wn|mb|th|ch|ec|oal|is|ck|ix|sser|ts|wb)ies$",
        "${1}ie",
    ),
    (
        r"\b(l|(?:neck|cross|hog|aun)?t|coll|faer|food|gen|goon|group|hipp|junk|vegg|(?:pork)?p|charl|calor|cut)ies$",
        "${1}ie",
    ),
    (r"\b(mon|smil)ies$", "${1}ey"),
    (r"\b((?:tit)?m|l)ice$", "${1}ouse"),
    (r"(seraph|cherub)im$", "${1}"),
    (
        r"(x|ch|ss|sh|zz|tto|go|cho|alias|[^aou]us|t[lm]as|gas|(?:her|at|gr)o|[aeiou]ris)(?:es)?$",
        "${1}",
    ),
    (
        r"(analy|diagno|parenthe|progno|synop|the|empha|cri|ne)(?:sis|ses)$",
        "${1}sis",
    ),
    (r"(movie|twelve|abuse|e[mn]u)s$", "${1}"),
    (r"(test)(?:is|es)$", "${1}is"),
    (
        r"(alumn|syllab|vir|radi|nucle|fung|cact|stimul|termin|bacill|foc|uter|loc|strat)(?:us|i)$",
        "${1}us",
    ),
    (
        r"(agend|addend|millenni|dat|extrem|bacteri|desiderat|strat|candelabr|errat|ov|symposi|curricul|quor)a$",
        "${1}um",
    ),
    (
        r"(apheli|hyperbat|periheli|asyndet|noumen|phenomen|criteri|organ|prolegomen|hedr|automat)a$",
        "${1}on",
    ),
    (r"(alumn|alg|vertebr)ae$", "${1}a"),
    (r"(cod|mur|sil|vert|ind)ices$", "${1}ex"),
    (r"(matr|append)ices$", "${1}ix"),
    (r"(pe)(rson|ople)$", "${1}rson"),
    (r"(child)ren$", "${1}"),
    (r"(eau)x?$", "${1}"),
    (r"men$", "man"),
];

/// (singular, plural)
const IRREGULARS: &[(&str, &str)] = &[
    ("echo", "echoes"),
    ("dingo", "dingoes"),
    ("volcano", "volcanoes"),
    ("tornado", "tornadoes"),
    ("torpedo", "torpedoes"),
    ("genus", "genera"),
    ("viscus", "viscera"),
    ("stigma", "stigmata"),
    ("stoma", "stomata"),
    ("dogma", "dogmata"),
    ("lemma", "lemmata"),
    ("schema", "schemata"),
    ("anathema", "anathemata"),
    ("ox", "oxen"),
    ("axe", "axes"),
    ("die", "dice"),
    ("yes", "yeses"),
    ("foot", "feet"),
    ("eave", "eaves"),
    ("goose", "geese"),
    ("tooth", "teeth"),
    ("quiz", "quizzes"),
    ("human", "humans"),
    ("proof", "proofs"),
    ("carve", "carves"),
    ("valve", "valves"),
    ("looey", "looies"),
    ("thief", "thieves"),
    ("groove", "grooves"),
    ("pickaxe", "pickaxes"),
    ("passerby", "passersby"),
];

const UNCOUNTABLE_WORDS: &[&str] = &[
    "adulthood", "advice", "agenda", "aid", "aircraft", "alcohol", "ammo", "analytics", "anime",
    "athletics", "audio", "bison", "blood", "bream", "buffalo", "butter", "carp", "cash",
    "chassis", "chess", "clothing", "cod", "commerce", "cooperation", "corps", "debris",
    "diabetes", "digestion", "elk", "energy", "equipment", "excretion", "expertise", "firmware",
    "flounder", "fun", "gallows", "garbage", "graffiti", "hardware", "headquarters", "health",
    "herpes", "highjinks", "homework", "housework", "information", "jeans", "justice", "kudos",
    "labour", "literature", "machinery", "mackerel", "mail", "media", "mews", "moose", "music",
    "mud", "manga", "news", "only", "personnel", "pike", "plankton", "pliers", "police",
    "pollution", "premises", "rain", "research", "rice", "salmon", "scissors", "series", "sewage",
    "shambles", "shrimp", "software", "staff", "swine", "tennis", "traffic", "transportation",
    "trout", "tuna", "wealth", "welfare", "whiting", "wildebeest", "wildlife", "you",
];

const UNCOUNTABLE_PATTERNS: &[&str] = &[
    r"pok[eé]mon$",
    r"[^aeiou]ese$",
    r"deer$",
    r"fish$",
    r"measles$",
    r"o[iu]s$",
    r"pox$",
    r"sheep$",
];

fn compile(pattern: &str) -> Regex {
    // The tables above are constants, exercised by the tests below.
    Regex::new(&format!("(?i){pattern}"))
        .unwrap_or_else(|e| panic!("bad inflection rule {pattern}: {e}"))
}

impl Inflector {
    fn new() -> Self {
        let rules = |table: &[(&str, &'static str)]| -> Vec<Rule> {
            table
                .iter()
                .map(|&(pattern, replacement)| Rule {
                    pattern: compile(pattern),
                    replacement,
                })
                .collect()
        };

        Self {
            plural_rules: rules(PLURAL_RULES),
            singular_rules: rules(SINGULAR_RULES),
            irregular_plurals: IRREGULARS.iter().map(|(s, p)| (*s, *p)).collect(),
            irregular_singles: IRREGULARS.iter().map(|(s, p)| (*p, *s)).collect(),
            uncountable_words: UNCOUNTABLE_WORDS.to_vec(),
            uncountable_patterns: UNCOUNTABLE_PATTERNS.iter().map(|p| compile(p)).collect(),
        }
    }

    fn is_uncountable(&self, token: &str) -> bool {
        self.uncountable_words.iter().any(|w| *w == token)
            || self.uncountable_patterns.iter().any(|re| re.is_match(token))
    }

    /// `replace` maps into the target form, `keep` holds words already in it.
    fn inflect(
        &self,
        word: &str,
        replace: &HashMap<&'static str, &'static str>,
        keep: &HashMap<&'static str, &'static str>,
        rules: &[Rule],
    ) -> String {
        let token = word.to_lowercase();

        if self.is_uncountable(&token) || keep.contains_key(token.as_str()) {
            return word.to_string();
        }
        if let Some(target) = replace.get(token.as_str()) {
            return restore_case(word, target);
        }

        match rules.iter().rev().find(|rule| rule.pattern.is_match(word)) {
            Some(rule) => rule
                .pattern
                .replace(word, |caps: &Captures| replace_suffix(word, caps, rule.replacement))
                .into_owned(),
            None => word.to_string(),
        }
    }
}

/// Expands `replacement` for one match, cased after the matched text only.
///
/// An empty match (`s?$` on `book`) takes its casing from the preceding
/// character, so the rest of a camelCase word is never touched.
fn replace_suffix(word: &str, caps: &Captures, replacement: &str) -> String {
    let mut expanded = String::new();
    caps.expand(replacement, &mut expanded);

    let matched = &caps[0];
    if !matched.is_empty() {
        return restore_case(matched, &expanded);
    }
    let start = caps.get(0).map_or(0, |m| m.start());
    match word[..start].chars().next_back() {
        Some(previous) => restore_case(previous.encode_utf8(&mut [0; 4]), &expanded),
        None => expanded,
    }
}

static INFLECTOR: LazyLock<Inflector> = LazyLock::new(Inflector::new);

/// Mirror the casing style of `word` onto `token`.
fn restore_case(word: &str, token: &str) -> String {
    if word == token {
        return token.to_string();
    }
    if word == word.to_lowercase() {
        return token.to_lowercase();
    }
    if word == word.to_uppercase() {
        return token.to_uppercase();
    }
    if word.starts_with(|c: char| c.is_uppercase()) {
        return capitalize(&token.to_lowercase());
    }
    token.to_lowercase()
}

/// Upper-cases the first character, leaving the rest untouched.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn plural(word: &str) -> String {
    let inflector = &*INFLECTOR;
    inflector.inflect(
        word,
        &inflector.irregular_plurals,
        &inflector.irregular_singles,
        &inflector.plural_rules,
    )
}

pub fn singular(word: &str) -> String {
    let inflector = &*INFLECTOR;
    inflector.inflect(
        word,
        &inflector.irregular_singles,
        &inflector.irregular_plurals,
        &inflector.singular_rules,
    )
}
