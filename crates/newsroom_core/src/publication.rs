//! crates/newsroom_core/src/publication.rs
//!
//! Per-publication configuration: default theme, blank template, UI strings,
//! image styling and the editorial voice handed to the generation provider.

use crate::domain::{
    DomainError, FrontPage, NewsIssueDraft, PublicationType, SecondPage, Section, ThemeType,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const BASE_IMAGE_STYLE: &str =
    " Photorealistic, high quality newspaper photography style, slightly grainy print texture.";

/// Language of the editor's UI strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Zh,
    En,
}

/// Static editor settings for one publication.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub publication: PublicationType,
    pub default_theme: ThemeType,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub empty_state_text: &'static str,
    pub is_dark: bool,
    pub locale: Locale,
}

impl EditorConfig {
    /// The publication's placeholder issue, dated `date`.
    pub fn blank_template(&self, date: NaiveDate) -> NewsIssueDraft {
        blank_template(self.publication, date)
    }
}

/// Looks up a publication's editor settings by name, ignoring case.
pub fn editor_config(name: &str) -> Result<EditorConfig, DomainError> {
    name.parse::<PublicationType>().map(PublicationType::editor_config)
}

impl PublicationType {
    pub fn editor_config(self) -> EditorConfig {
        match self {
            PublicationType::Triangle => EditorConfig {
                publication: self,
                default_theme: ThemeType::ClassicRed,
                title: "三角日报编辑器",
                subtitle: "Triangle CMS v4.0",
                empty_state_text: "在此处预览生成的新闻日报",
                is_dark: false,
                locale: Locale::Zh,
            },
            PublicationType::Duskvol => EditorConfig {
                publication: self,
                default_theme: ThemeType::Noir,
                title: "The Press Room",
                subtitle: "Duskvol Chronicle • Printing Press",
                empty_state_text: "The printing press awaits...",
                is_dark: true,
                locale: Locale::En,
            },
            PublicationType::Adventurer => EditorConfig {
                publication: self,
                default_theme: ThemeType::Parchment,
                title: "冒险者工会日报",
                subtitle: "Adventurer Guild • Daily Report",
                empty_state_text: "羊皮纸准备就绪...",
                is_dark: false,
                locale: Locale::Zh,
            },
        }
    }

    pub fn editorial_profile(self) -> EditorialProfile {
        match self {
            PublicationType::Triangle => EditorialProfile {
                paper_name: "Triangle Daily (三角日报)",
                persona: "You are the editor-in-chief of a stylish, modern avant-garde newspaper.",
                tone: "professional, geometric, sharp",
                weird_news_focus: "General weirdness",
                classifieds_flavor: "",
                image_focus: "Focus on geometric shapes, clean lines, high contrast.",
            },
            PublicationType::Duskvol => EditorialProfile {
                paper_name: "The Duskvol Chronicle (多斯科沃公报)",
                persona: "You are the editor of a grim, industrial-fantasy newspaper in a city of eternal night and ghosts.",
                tone: "cynical, atmospheric, shadowy",
                weird_news_focus: "Focus on ghosts, electroplasm, or crime",
                classifieds_flavor: "selling spirits, lightning oil, etc.",
                image_focus: "Focus on fog, gaslamps, industrial decay, shadows, Victorian era aesthetic.",
            },
            PublicationType::Adventurer => EditorialProfile {
                paper_name: "Adventurer Guild Daily (冒险者工会日报)",
                persona: "You are the chronicler of an adventurers' guild in a high-fantasy city, reporting on quests, dungeons and monsters.",
                tone: "lively, heroic, a little tongue-in-cheek",
                weird_news_focus: "Focus on strange monsters and cursed loot",
                classifieds_flavor: "party recruitment, enchanted gear, potion sales",
                image_focus: "Focus on fantasy painting, warm torchlight, detailed guild halls and landscapes.",
            },
        }
    }
}

/// The editorial voice used when asking the provider for an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorialProfile {
    pub paper_name: &'static str,
    pub persona: &'static str,
    pub tone: &'static str,
    pub weird_news_focus: &'static str,
    pub classifieds_flavor: &'static str,
    pub image_focus: &'static str,
}

/// Style phrase appended to every image prompt.
///
/// Duskvol has one fixed look regardless of theme; other publications follow the theme.
pub fn image_style_suffix(publication: PublicationType, theme: ThemeType) -> String {
    let accent = if publication == PublicationType::Duskvol {
        " Victorian era, industrial steampunk, moody, gaslamp fantasy, heavy shadows, high contrast black and white photography."
    } else {
        match theme {
            ThemeType::ClassicRed => " High contrast, desaturated world with strong red accents.",
            ThemeType::DeepBlue => " Cool blue tones, cinematic lighting, cyanotype aesthetic, deep shadows.",
            ThemeType::Emerald => " Muted green tones, nature-inspired palette, vintage botanical feel.",
            ThemeType::Noir => " Black and white film noir style, high contrast, harsh shadows, chiaroscuro.",
            ThemeType::Parchment => " High contrast.",
        }
    };
    format!("{}{}", BASE_IMAGE_STYLE, accent)
}

pub fn styled_image_prompt(prompt: &str, publication: PublicationType, theme: ThemeType) -> String {
    format!("{}{}", prompt, image_style_suffix(publication, theme))
}

//=========================================================================================
// Blank Templates
//=========================================================================================

fn sections(items: [(&str, &str); 3]) -> Vec<Section> {
    items.into_iter().map(|(t, c)| Section::new(t, c)).collect()
}

/// A fully-populated placeholder issue, so every section is clickable in an empty editor.
pub fn blank_template(publication: PublicationType, date: NaiveDate) -> NewsIssueDraft {
    let date = date.format("%Y-%m-%d").to_string();
    match publication {
        PublicationType::Triangle => NewsIssueDraft {
            date,
            location: "北京".to_string(),
            front_page: FrontPage {
                headline: "点击编辑标题".to_string(),
                main_story: "点击编辑主要新闻内容...".to_string(),
                main_image_prompt: String::new(),
                news_snippets: sections([
                    ("快讯标题 1", "点击编辑快讯内容..."),
                    ("快讯标题 2", "点击编辑快讯内容..."),
                    ("快讯标题 3", "点击编辑快讯内容..."),
                ]),
                column1: Section::new("专栏 1", "点击编辑专栏内容..."),
                column2: Section::new("专栏 2", "点击编辑专栏内容..."),
                weird_news: Section::new("趣闻", "点击编辑趣闻内容..."),
                scale: None,
            },
            second_page: SecondPage {
                editorial: Section::new("社论标题", "点击编辑社论内容..."),
                culture: Section::new("文化专栏", "点击编辑文化专栏内容..."),
                classifieds: sections([
                    ("分类广告 1", "点击编辑广告内容..."),
                    ("分类广告 2", "点击编辑广告内容..."),
                    ("分类广告 3", "点击编辑广告内容..."),
                ]),
                horoscope: "点击编辑今日箴言...".to_string(),
                scale: None,
            },
        },
        PublicationType::Duskvol => NewsIssueDraft {
            date,
            location: "Duskvol".to_string(),
            front_page: FrontPage {
                headline: "Click to Edit Headline".to_string(),
                main_story: "Click to edit main story content...".to_string(),
                main_image_prompt: String::new(),
                news_snippets: sections([
                    ("Whisper 1", "Click to edit whisper..."),
                    ("Whisper 2", "Click to edit whisper..."),
                    ("Whisper 3", "Click to edit whisper..."),
                ]),
                column1: Section::new("Column 1", "Click to edit column content..."),
                column2: Section::new("Column 2", "Click to edit column content..."),
                weird_news: Section::new("Dark News", "Click to edit dark news..."),
                scale: None,
            },
            second_page: SecondPage {
                editorial: Section::new("Editorial Title", "Click to edit editorial..."),
                culture: Section::new("Culture", "Click to edit culture section..."),
                classifieds: sections([
                    ("Classified 1", "Click to edit..."),
                    ("Classified 2", "Click to edit..."),
                    ("Classified 3", "Click to edit..."),
                ]),
                horoscope: "Click to edit dark wisdom...".to_string(),
                scale: None,
            },
        },
        PublicationType::Adventurer => NewsIssueDraft {
            date,
            location: "无冬城".to_string(),
            front_page: FrontPage {
                headline: "点击编辑今日头条".to_string(),
                main_story: "在此输入主要新闻内容，例如巨龙袭击或新的地下城发现...".to_string(),
                main_image_prompt:
                    "Fantasy adventurer guild hall, bustling with activity, detailed painting"
                        .to_string(),
                news_snippets: sections([
                    ("酒馆传闻 1", "点击编辑传闻..."),
                    ("酒馆传闻 2", "点击编辑传闻..."),
                    ("酒馆传闻 3", "点击编辑传闻..."),
                ]),
                column1: Section::new("悬赏任务", "点击编辑任务详情..."),
                column2: Section::new("公会公告", "点击编辑公告内容..."),
                weird_news: Section::new("怪物图鉴", "点击编辑怪物信息..."),
                scale: None,
            },
            second_page: SecondPage {
                editorial: Section::new("每周之星", "点击编辑优秀冒险者事迹..."),
                culture: Section::new("装备行情", "点击编辑市场价格..."),
                classifieds: sections([
                    ("组队招募 1", "点击编辑招募信息..."),
                    ("组队招募 2", "点击编辑招募信息..."),
                    ("组队招募 3", "点击编辑招募信息..."),
                ]),
                horoscope: "点击编辑今日运势...".to_string(),
                scale: None,
            },
        },
    }
}
