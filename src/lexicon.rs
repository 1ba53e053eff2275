use std::borrow::Cow;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use crate::error::Result;

// ---------------------------------------------------------------------------
// Table data
// ---------------------------------------------------------------------------

/// Formal word or phrase -> casual replacement, applied in this order.
const VOCABULARY: &[(&str, &str)] = &[
    // Formal academic words
    ("utilize", "use"),
    ("utilization", "use"),
    ("utilized", "used"),
    ("implement", "do"),
    ("implementation", "doing"),
    ("implemented", "did"),
    ("facilitate", "help"),
    ("facilitating", "helping"),
    ("facilitated", "helped"),
    ("demonstrate", "show"),
    ("demonstrates", "shows"),
    ("demonstrated", "showed"),
    ("indicate", "show"),
    ("indicates", "shows"),
    ("indicated", "showed"),
    ("significant", "big"),
    ("significantly", "really"),
    ("substantial", "large"),
    ("substantially", "really"),
    ("numerous", "many"),
    ("various", "different"),
    ("multiple", "many"),
    // Transitions
    ("however", "but"),
    ("nevertheless", "but"),
    ("furthermore", "also"),
    ("therefore", "so"),
    ("consequently", "so"),
    ("subsequently", "then"),
    ("moreover", "also"),
    ("additionally", "also"),
    ("alternatively", "or"),
    ("approximately", "around"),
    // Nominalizations and their verbs
    ("methodology", "method"),
    ("methodologies", "methods"),
    ("optimization", "improvement"),
    ("optimizations", "improvements"),
    ("enhancement", "improvement"),
    ("enhancements", "improvements"),
    ("acquisition", "getting"),
    ("acquire", "get"),
    ("acquired", "got"),
    ("comprehension", "understanding"),
    ("comprehend", "understand"),
    ("determination", "finding out"),
    ("determine", "find out"),
    ("examination", "looking at"),
    ("examine", "look at"),
    ("investigation", "checking"),
    ("investigate", "check"),
    ("establishment", "setting up"),
    ("establish", "set up"),
    ("consideration", "thinking about"),
    ("consider", "think about"),
    ("evaluation", "checking"),
    ("evaluate", "check"),
    ("analysis", "breakdown"),
    ("analyze", "break down"),
    ("synthesis", "putting together"),
    ("synthesize", "put together"),
    ("verification", "checking"),
    ("verify", "check"),
    ("modification", "change"),
    ("modify", "change"),
    ("modified", "changed"),
    ("generation", "making"),
    ("generate", "make"),
    ("generated", "made"),
    ("creation", "making"),
    ("create", "make"),
    ("created", "made"),
    ("construction", "building"),
    ("construct", "build"),
    ("constructed", "built"),
    ("development", "building"),
    ("develop", "build"),
    ("developed", "built"),
    ("production", "making"),
    ("produce", "make"),
    ("produced", "made"),
    ("administration", "running"),
    ("administer", "run"),
    ("administered", "ran"),
    ("coordination", "organizing"),
    ("coordinate", "organize"),
    ("coordinated", "organized"),
    ("collaboration", "working together"),
    ("collaborate", "work together"),
    ("communication", "talking"),
    ("communicate", "talk"),
    ("communicated", "talked"),
    ("documentation", "writing down"),
    ("document", "write down"),
    ("documented", "wrote down"),
    ("specification", "details"),
    ("specify", "detail"),
    ("specified", "detailed"),
    ("requirement", "need"),
    ("requirements", "needs"),
    ("required", "needed"),
    ("recommendation", "suggestion"),
    ("recommend", "suggest"),
    ("recommended", "suggested"),
    ("conclusion", "ending"),
    ("conclude", "end"),
    ("concluded", "ended"),
    ("decision", "choice"),
    ("decide", "choose"),
    ("decided", "chose"),
    ("selection", "picking"),
    ("select", "pick"),
    ("selected", "picked"),
    ("identification", "finding"),
    ("identify", "find"),
    ("identified", "found"),
    ("recognition", "spotting"),
    ("recognize", "spot"),
    ("recognized", "spotted"),
    ("observation", "seeing"),
    ("observe", "see"),
    ("observed", "saw"),
    ("notification", "telling"),
    ("notify", "tell"),
    ("notified", "told"),
    ("information", "info"),
    ("informational", "info-based"),
    ("operational", "working"),
    ("operations", "work"),
    ("operate", "work"),
    ("functional", "working"),
    ("function", "work"),
    ("functions", "works"),
    ("professional", "work-related"),
    ("professionalism", "being professional"),
    // Adjectives and adverbs
    ("traditional", "old"),
    ("traditionally", "usually"),
    ("conventional", "normal"),
    ("conventionally", "normally"),
    ("fundamental", "basic"),
    ("fundamentally", "basically"),
    ("essential", "key"),
    ("essentially", "basically"),
    ("critical", "important"),
    ("critically", "importantly"),
    ("optimal", "best"),
    ("optimally", "best way"),
    ("maximum", "most"),
    ("maximize", "boost"),
    ("maximized", "boosted"),
    ("minimum", "least"),
    ("minimize", "reduce"),
    ("minimized", "reduced"),
    ("superior", "better"),
    ("superiority", "being better"),
    ("inferior", "worse"),
    ("inferiority", "being worse"),
    ("advanced", "newer"),
    ("advancement", "improvement"),
    ("sophisticated", "complex"),
    ("sophistication", "complexity"),
    ("comprehensive", "complete"),
    ("comprehensively", "completely"),
    ("extensive", "wide"),
    ("extensively", "widely"),
    ("intensive", "heavy"),
    ("intensively", "heavily"),
    ("effective", "good"),
    ("effectiveness", "how good"),
    ("efficient", "fast"),
    ("efficiency", "speed"),
    ("accurate", "right"),
    ("accuracy", "being right"),
    ("precise", "exact"),
    ("precision", "being exact"),
    ("reliable", "dependable"),
    ("reliability", "dependability"),
    ("consistent", "steady"),
    ("consistency", "steadiness"),
    ("persistent", "lasting"),
    ("persistence", "lasting"),
    ("continuous", "ongoing"),
    ("continuously", "ongoing"),
    ("simultaneous", "at the same time"),
    ("simultaneously", "at the same time"),
    ("immediate", "instant"),
    ("immediately", "right away"),
    ("subsequent", "next"),
    ("previous", "earlier"),
    ("previously", "before"),
    ("initial", "first"),
    ("initially", "at first"),
    ("final", "last"),
    ("finally", "in the end"),
    ("ultimate", "final"),
    ("ultimately", "in the end"),
    ("primary", "main"),
    ("primarily", "mainly"),
    ("secondary", "second"),
    ("secondarily", "secondly"),
    ("tertiary", "third"),
    ("alternative", "other"),
    ("additional", "extra"),
    ("supplementary", "extra"),
    ("supplement", "add to"),
    ("complementary", "matching"),
    ("complement", "match"),
    ("proportional", "matching"),
    ("proportion", "part"),
    ("equivalent", "equal"),
    ("equivalence", "equality"),
    ("identical", "same"),
    ("identity", "sameness"),
    ("similar", "alike"),
    ("similarity", "likeness"),
    ("different", "unlike"),
    ("difference", "gap"),
    ("distinct", "separate"),
    ("distinction", "separation"),
    ("unique", "one-of-a-kind"),
    ("uniqueness", "being one-of-a-kind"),
    ("specific", "exact"),
    ("specifically", "exactly"),
    ("general", "broad"),
    ("generally", "broadly"),
    ("particular", "specific"),
    ("particularly", "especially"),
    ("individual", "single"),
    ("individually", "one by one"),
    ("collective", "group"),
    ("collectively", "as a group"),
    ("universal", "worldwide"),
    ("universally", "worldwide"),
    ("global", "worldwide"),
    ("globally", "worldwide"),
    ("local", "nearby"),
    ("locally", "nearby"),
    ("regional", "area-based"),
    ("regionally", "by area"),
    ("national", "country-wide"),
    ("nationally", "country-wide"),
    ("international", "between countries"),
    ("internationally", "between countries"),
];

const CONTRACTIONS: &[(&str, &str)] = &[
    ("do not", "don't"),
    ("does not", "doesn't"),
    ("did not", "didn't"),
    ("will not", "won't"),
    ("would not", "wouldn't"),
    ("could not", "couldn't"),
    ("should not", "shouldn't"),
    ("cannot", "can't"),
    ("must not", "mustn't"),
    ("have not", "haven't"),
    ("has not", "hasn't"),
    ("had not", "hadn't"),
    ("is not", "isn't"),
    ("are not", "aren't"),
    ("was not", "wasn't"),
    ("were not", "weren't"),
    ("it is", "it's"),
    ("that is", "that's"),
    ("there is", "there's"),
    ("here is", "here's"),
    ("what is", "what's"),
    ("where is", "where's"),
    ("when is", "when's"),
    ("how is", "how's"),
    ("who is", "who's"),
    ("I am", "I'm"),
    ("you are", "you're"),
    ("we are", "we're"),
    ("they are", "they're"),
    ("I will", "I'll"),
    ("you will", "you'll"),
    ("we will", "we'll"),
    ("they will", "they'll"),
    ("I would", "I'd"),
    ("you would", "you'd"),
    ("we would", "we'd"),
    ("they would", "they'd"),
    ("I have", "I've"),
    ("you have", "you've"),
    ("we have", "we've"),
    ("they have", "they've"),
];

/// Less formal grammar; each pair is applied with its own draw.
const GRAMMAR_PAIRS: &[(&str, &str)] = &[
    ("who are", "that are"),
    ("which are", "that are"),
    ("among", "between"),
    ("regarding", "about"),
    ("concerning", "about"),
    ("prior to", "before"),
    ("subsequent to", "after"),
    ("in order to", "to"),
    ("due to the fact that", "because"),
    ("for the reason that", "because"),
    ("in spite of the fact that", "even though"),
    ("notwithstanding the fact that", "even though"),
];

/// Formal transitions stripped from the start of a sentence.
const TRANSITIONS: &[&str] = &[
    "in conclusion",
    "in summary",
    "to summarize",
    "in essence",
    "furthermore",
    "moreover",
    "additionally",
    "nevertheless",
    "however",
    "consequently",
    "therefore",
    "thus",
    "hence",
    "accordingly",
    "subsequently",
];

pub const HUMAN_STARTERS: &[&str] = &[
    "Well, ",
    "Actually, ",
    "You know, ",
    "Honestly, ",
    "Look, ",
    "Listen, ",
    "So, ",
    "Anyway, ",
    "I mean, ",
    "To be fair, ",
    "Let's be real, ",
    "Here's the thing - ",
    "The way I see it, ",
    "From what I can tell, ",
    "As far as I know, ",
    "It seems like ",
    "Basically, ",
    "Pretty much, ",
    "More or less, ",
    "Kind of ",
    "Sort of ",
    "I guess ",
    "Maybe ",
    "Probably ",
    "Likely ",
    "It's like ",
    "Think about it - ",
    "Consider this: ",
    "Get this - ",
    "Check it out - ",
    "Here's what happens: ",
];

pub const CONNECTORS: &[&str] = &[
    "and then",
    "so then",
    "after that",
    "next thing",
    "plus",
    "on top of that",
    "what's more",
    "not to mention",
    "besides",
    "by the way",
    "speaking of which",
    "while we're at it",
    "come to think of it",
    "now that I think about it",
];

pub const FILLERS: &[&str] = &[
    "you know",
    "like",
    "I mean",
    "sort of",
    "kind of",
    "pretty much",
    "more or less",
    "or something",
    "or whatever",
    "and stuff",
    "and things like that",
    "and all that",
    "you get the idea",
    "if you know what I mean",
    "right?",
    "you see",
];

pub const CASUAL_TAGS: &[&str] = &[
    ", right?",
    ", you know?",
    ", if you ask me",
    ", honestly",
    ", to be honest",
    ", let's be real",
    ", no joke",
    ", seriously",
];

// ---------------------------------------------------------------------------
// Compiled tables
// ---------------------------------------------------------------------------

fn whole_word(phrase: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(r"(?i)\b{}\b", regex::escape(phrase)))?)
}

/// One case-insensitive, whole-word substitution.
#[derive(Debug, Clone)]
pub struct ReplacementRule {
    source: String,
    replacement: String,
    pattern: Regex,
}

impl ReplacementRule {
    pub fn new(source: &str, replacement: &str) -> Result<Self> {
        Ok(Self {
            source: source.to_string(),
            replacement: replacement.to_string(),
            pattern: whole_word(source)?,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn spans<'t>(&'t self, text: &'t str) -> impl Iterator<Item = (usize, usize)> + 't {
        self.pattern.find_iter(text).map(|m| (m.start(), m.end()))
    }

    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.pattern
            .replace_all(text, NoExpand(self.replacement.as_str()))
    }
}

/// Ordered substitution table. Each rule re-scans the output of the rules
/// before it, so a replacement may be picked up by a later source phrase.
#[derive(Debug, Clone, Default)]
pub struct ReplacementTable {
    rules: Vec<ReplacementRule>,
}

impl ReplacementTable {
    pub fn from_pairs<S: AsRef<str>>(pairs: &[(S, S)]) -> Result<Self> {
        let rules = pairs
            .iter()
            .map(|(source, replacement)| ReplacementRule::new(source.as_ref(), replacement.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[ReplacementRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn push(&mut self, rule: ReplacementRule) {
        self.rules.push(rule);
    }

    pub fn apply_all(&self, text: &str) -> String {
        let mut out = text.to_string();
        for rule in &self.rules {
            if let Cow::Owned(replaced) = rule.apply(&out) {
                out = replaced;
            }
        }
        out
    }
}

/// Formal transition markers, matched only at the start of a sentence.
#[derive(Debug, Clone)]
pub struct PatternList {
    patterns: Vec<Regex>,
}

impl PatternList {
    pub fn from_phrases(phrases: &[&str]) -> Result<Self> {
        let patterns = phrases
            .iter()
            .map(|p| Regex::new(&format!(r"(?i)^\s*\b{}\b\s*,?\s*", regex::escape(p))))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Removes leading markers, returning the remainder and how many were cut.
    pub fn strip_leading(&self, sentence: &str) -> (String, usize) {
        let mut out = sentence.to_string();
        let mut stripped = 0;
        // every match consumes a whole marker, so this terminates
        while let Some(end) = self
            .patterns
            .iter()
            .find_map(|pat| pat.find(&out).map(|m| m.end()))
        {
            out.replace_range(..end, "");
            stripped += 1;
        }
        (out, stripped)
    }
}

#[derive(Debug, Clone)]
pub struct Lexicon {
    pub vocabulary: ReplacementTable,
    pub contractions: ReplacementTable,
    pub grammar: ReplacementTable,
    pub transitions: PatternList,
    pub starters: Vec<String>,
    pub connectors: Vec<String>,
    pub fillers: Vec<String>,
    pub casual_tags: Vec<String>,
}

static ENGLISH: Lazy<Arc<Lexicon>> = Lazy::new(|| Arc::new(Lexicon::build_english().unwrap()));

fn owned(pool: &[&str]) -> Vec<String> {
    pool.iter().map(|s| s.to_string()).collect()
}

impl Lexicon {
    /// The built-in English tables, compiled once per process.
    pub fn english() -> Arc<Lexicon> {
        Arc::clone(&ENGLISH)
    }

    fn build_english() -> Result<Self> {
        Ok(Self {
            vocabulary: ReplacementTable::from_pairs(VOCABULARY)?,
            contractions: ReplacementTable::from_pairs(CONTRACTIONS)?,
            grammar: ReplacementTable::from_pairs(GRAMMAR_PAIRS)?,
            transitions: PatternList::from_phrases(TRANSITIONS)?,
            starters: owned(HUMAN_STARTERS),
            connectors: owned(CONNECTORS),
            fillers: owned(FILLERS),
            casual_tags: owned(CASUAL_TAGS),
        })
    }

    /// Appends extra vocabulary after the built-in entries.
    pub fn with_extra_vocabulary(mut self, extra: &[(String, String)]) -> Result<Self> {
        for (source, replacement) in extra {
            self.vocabulary
                .push(ReplacementRule::new(source, replacement)?);
        }
        Ok(self)
    }

    /// True when joining `left` and `right` with a space would create an
    /// expanded contraction that spans the gap between them.
    pub fn joins_contraction(&self, left: &str, right: &str) -> bool {
        let joined = format!("{left} {right}");
        let gap = left.len();
        self.contractions.rules().iter().any(|rule| {
            rule.spans(&joined)
                .any(|(start, end)| start <= gap && end > gap + 1)
        })
    }
}
