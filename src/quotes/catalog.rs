//! # Quote Store
//!
//! The built-in quotes shown by the idle orb, plus the small helpers used to
//! pick one at random.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Attribution used when a quote arrives without an author.
pub const DEFAULT_AUTHOR: &str = "佚名";

/// A single quote. Built through [`Quote::new`] so the text is never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl Quote {
    /// Build a quote, trimming both fields.
    ///
    /// Returns `None` when the text is blank. A blank author falls back to
    /// [`DEFAULT_AUTHOR`].
    pub fn new(text: impl AsRef<str>, author: impl AsRef<str>) -> Option<Self> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return None;
        }
        let author = match author.as_ref().trim() {
            "" => DEFAULT_AUTHOR,
            author => author,
        };
        Some(Self {
            text: text.to_string(),
            author: author.to_string(),
        })
    }

    /// Number of characters (not bytes) in the text.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

struct Entry {
    text: &'static str,
    author: &'static str,
}

const fn q(text: &'static str, author: &'static str) -> Entry {
    Entry { text, author }
}

static ENTRIES: [Entry; 36] = [
    // classical philosophy and poetry
    q("知行合一", "王阳明"),
    q("逝者如斯夫，不舍昼夜", "孔子"),
    q("不积跬步，无以至千里", "荀子"),
    q("天行健，君子以自强不息", "周易"),
    q("海纳百川，有容乃大", "林则徐"),
    q("路漫漫其修远兮，吾将上下而求索", "屈原"),
    q("大漠孤烟直，长河落日圆", "王维"),
    q("行到水窮處，坐看雲起時", "王维"),
    q("非淡泊无以明志，非宁静无以致远", "诸葛亮"),
    q("曾经沧海难为水，除却巫山不是云", "元稹"),
    q("人生若只如初见", "纳兰性德"),
    q("仰天大笑出门去，我辈岂是蓬蒿人", "李白"),
    q("众里寻他千百度", "辛弃疾"),
    q("此时无声胜有声", "白居易"),
    q("心远地自偏", "陶渊明"),
    // modern literature and essays
    q("生如夏花之绚烂，死如秋叶之静美", "泰戈尔"),
    q("不乱于心，不困于情", "丰子恺"),
    q("从前的日色变得慢，车，马，邮件都慢", "木心"),
    q("这里有最好的时代，这里有最坏的时代", "狄更斯"),
    q("满地都是六便士，他却抬头看见了月亮", "毛姆"),
    q("我见青山多妩媚，料青山见我应如是", "辛弃疾"),
    q("生活在别处", "兰波"),
    q("万物皆有裂痕，那是光照进来的地方", "莱昂纳德"),
    q("未经审视的人生不值得过", "苏格拉底"),
    q("给岁月以文明，而不是给文明以岁月", "刘慈欣"),
    q("人不是为了失败而生的", "海明威"),
    q("世界上只有一种英雄主义", "罗曼·罗兰"),
    q("你的负担将变成礼物，你受的苦将照亮你的路", "泰戈尔"),
    // short maxims
    q("慎独", "曾国藩"),
    q("上善若水", "老子"),
    q("初心", "华严经"),
    q("无问西东", "清华校歌"),
    q("道法自然", "老子"),
    q("凡属过去，皆为序章", "莎士比亚"),
    q("Stay Hungry, Stay Foolish", "Jobs"),
    q("凛冬将至", "权力的游戏"),
];

/// The built-in quote list.
pub fn builtin_quotes() -> Vec<Quote> {
    ENTRIES
        .iter()
        .filter_map(|e| Quote::new(e.text, e.author))
        .collect()
}

/// Pick any quote from `quotes`.
pub fn random_quote<R: Rng + ?Sized>(rng: &mut R, quotes: &[Quote]) -> Option<Quote> {
    quotes.choose(rng).cloned()
}

/// Pick a quote whose text differs from `current`.
///
/// Sampling is uniform over the entries with a different text, which is the
/// same distribution as drawing and redrawing until the text changes. Returns
/// `None` when every entry shares the current text.
pub fn random_quote_excluding<R: Rng + ?Sized>(
    rng: &mut R,
    quotes: &[Quote],
    current: &Quote,
) -> Option<Quote> {
    let candidates: Vec<&Quote> = quotes.iter().filter(|q| q.text != current.text).collect();
    candidates.choose(rng).map(|q| (*q).clone())
}

/// Visual size tier for a quote, chosen from its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteScale {
    Grand,
    Large,
    Medium,
    Small,
}

impl QuoteScale {
    pub fn for_text(text: &str) -> Self {
        match text.chars().count() {
            0..=4 => QuoteScale::Grand,
            5..=10 => QuoteScale::Large,
            11..=18 => QuoteScale::Medium,
            _ => QuoteScale::Small,
        }
    }

    /// Blank rows inserted between glyphs of a vertical column.
    pub fn glyph_gap(self) -> u16 {
        match self {
            QuoteScale::Grand => 1,
            _ => 0,
        }
    }

    /// Blank cells between adjacent columns.
    pub fn column_gap(self) -> u16 {
        match self {
            QuoteScale::Grand | QuoteScale::Large => 2,
            QuoteScale::Medium | QuoteScale::Small => 1,
        }
    }
}
