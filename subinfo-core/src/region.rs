//! Region classification of node names.
//!
//! Nodes are bucketed by keyword matches against a fixed, ordered rule
//! table. The first matching rule wins and unmatched names fall into
//! [`OTHER_REGION`].

/// Bucket for names that match no rule.
pub const OTHER_REGION: &str = "Other";

/// Summary used for an empty node list.
pub const NO_NODES: &str = "no nodes";

/// One row of the region rule table.
#[derive(Debug, Clone, Copy)]
pub struct RegionRule {
    /// Label shown in summaries.
    pub label: &'static str,
    /// Lower-case keywords.
    pub keywords: &'static [&'static str],
}

/// Built-in rule table, in match order.
pub const REGION_RULES: &[RegionRule] = &[
    RegionRule {
        label: "香港",
        keywords: &["香港", "hong kong", "hongkong", "hk", "🇭🇰"],
    },
    RegionRule {
        label: "台湾",
        keywords: &["台湾", "台灣", "taiwan", "taipei", "tw", "🇹🇼"],
    },
    RegionRule {
        label: "日本",
        keywords: &["日本", "japan", "tokyo", "osaka", "jp", "🇯🇵"],
    },
    RegionRule {
        label: "新加坡",
        keywords: &["新加坡", "狮城", "singapore", "sg", "🇸🇬"],
    },
    RegionRule {
        label: "美国",
        keywords: &[
            "美国",
            "美國",
            "united states",
            "america",
            "los angeles",
            "san jose",
            "seattle",
            "new york",
            "silicon valley",
            "usa",
            "us",
            "🇺🇸",
        ],
    },
    RegionRule {
        label: "韩国",
        keywords: &["韩国", "韓國", "korea", "seoul", "kr", "🇰🇷"],
    },
    RegionRule {
        label: "英国",
        keywords: &["英国", "united kingdom", "britain", "london", "uk", "gb", "🇬🇧"],
    },
    RegionRule {
        label: "德国",
        keywords: &["德国", "germany", "frankfurt", "de", "🇩🇪"],
    },
    RegionRule {
        label: "法国",
        keywords: &["法国", "france", "paris", "fr", "🇫🇷"],
    },
    RegionRule {
        label: "荷兰",
        keywords: &["荷兰", "netherlands", "amsterdam", "nl", "🇳🇱"],
    },
    RegionRule {
        label: "俄罗斯",
        keywords: &["俄罗斯", "russia", "moscow", "ru", "🇷🇺"],
    },
    RegionRule {
        label: "加拿大",
        keywords: &["加拿大", "canada", "toronto", "ca", "🇨🇦"],
    },
    RegionRule {
        label: "澳大利亚",
        keywords: &["澳大利亚", "澳洲", "australia", "sydney", "au", "🇦🇺"],
    },
    RegionRule {
        label: "土耳其",
        keywords: &["土耳其", "turkey", "istanbul", "tr", "🇹🇷"],
    },
];

/// Short ASCII codes (`hk`, `usa`) only match a whole run of ASCII letters,
/// otherwise `us` would hit `australia` and `de` would hit `node`.
fn is_code(keyword: &str) -> bool {
    (2..=3).contains(&keyword.len()) && keyword.bytes().all(|b| b.is_ascii_alphabetic())
}

fn matches(name: &str, keyword: &str) -> bool {
    if is_code(keyword) {
        // Digits and separators both end a run, so `hk01` and `hk-01` yield `hk`.
        name.split(|c: char| !c.is_ascii_alphabetic())
            .any(|token| token == keyword)
    } else {
        name.contains(keyword)
    }
}

/// Classifies node names against a rule table.
#[derive(Debug, Clone, Copy)]
pub struct RegionClassifier {
    rules: &'static [RegionRule],
}

impl RegionClassifier {
    /// Creates a classifier over the given rule table.
    pub fn new(rules: &'static [RegionRule]) -> Self {
        Self { rules }
    }

    /// Returns the index of the first rule matching `name`, if any.
    fn rule_index(&self, name: &str) -> Option<usize> {
        let name = name.to_lowercase();
        self.rules
            .iter()
            .position(|rule| rule.keywords.iter().any(|kw| matches(&name, kw)))
    }

    /// Returns the region label for a single node name.
    pub fn classify(&self, name: &str) -> &'static str {
        self.rule_index(name)
            .map_or(OTHER_REGION, |idx| self.rules[idx].label)
    }

    /// Counts names per region, in rule-table order with `Other` last.
    ///
    /// Regions with no nodes are omitted.
    pub fn counts<'a, I>(&self, names: I) -> Vec<(&'static str, usize)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut buckets = vec![0_usize; self.rules.len() + 1];
        for name in names {
            let slot = self.rule_index(name).unwrap_or(self.rules.len());
            buckets[slot] += 1;
        }

        buckets
            .into_iter()
            .enumerate()
            .filter(|(_, count)| *count > 0)
            .map(|(idx, count)| {
                let label = self.rules.get(idx).map_or(OTHER_REGION, |r| r.label);
                (label, count)
            })
            .collect()
    }

    /// Renders a `region:count | region:count` summary.
    ///
    /// Returns [`NO_NODES`] for an empty input.
    pub fn summarize<'a, I>(&self, names: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let counts = self.counts(names);
        if counts.is_empty() {
            return NO_NODES.to_string();
        }
        counts
            .iter()
            .map(|(label, count)| format!("{label}:{count}"))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl Default for RegionClassifier {
    fn default() -> Self {
        Self::new(REGION_RULES)
    }
}
