//! Community page markup
//!
//! The page has no stable schema: every field is located by walking a fixed
//! chain of child elements identified by obfuscated class names. Each field
//! lists its alternative paths in precedence order because the same logical
//! field renders differently for plain, pinned, reshared and link posts.
//! When the markup changes, this is the only file that needs to follow it.

use scraper::node::Element;

/// Markup revision these patterns were written against
pub const MARKUP_REVISION: &str = "2018-11";

/// CSS selector for post containers (both class fragments must be present)
pub const POST_CONTAINER: &str = "div[class*='Ihwked'][class*='hE2QI']";

/// How a step filters candidate child elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// Any element with the right tag
    None,
    /// `class` attribute equals the value exactly
    ClassIs(&'static str),
    /// `class` attribute contains the value as a substring
    ClassContains(&'static str),
    /// Named attribute equals the value exactly
    AttrIs(&'static str, &'static str),
}

/// One child step in a query path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub tag: &'static str,
    pub filter: Filter,
}

impl Step {
    pub fn matches(&self, el: &Element) -> bool {
        if el.name() != self.tag {
            return false;
        }
        match self.filter {
            Filter::None => true,
            Filter::ClassIs(class) => el.attr("class") == Some(class),
            Filter::ClassContains(fragment) => el.attr("class").is_some_and(|c| c.contains(fragment)),
            Filter::AttrIs(name, value) => el.attr(name) == Some(value),
        }
    }
}

/// What to read from the element a path ends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// First non-blank direct text child
    Text,
    /// Attribute value
    Attr(&'static str),
}

/// A path of child steps from the post container plus the value to read
#[derive(Debug, Clone, Copy)]
pub struct QueryPattern {
    pub steps: &'static [Step],
    pub target: Target,
}

/// A post field and its alternative patterns, first match wins
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub patterns: &'static [QueryPattern],
}

const fn tag(tag: &'static str) -> Step {
    Step { tag, filter: Filter::None }
}

const fn class_is(tag: &'static str, class: &'static str) -> Step {
    Step { tag, filter: Filter::ClassIs(class) }
}

const fn class_has(tag: &'static str, fragment: &'static str) -> Step {
    Step { tag, filter: Filter::ClassContains(fragment) }
}

const fn jsname(tag: &'static str, value: &'static str) -> Step {
    Step { tag, filter: Filter::AttrIs("jsname", value) }
}

// Post header blocks
const HEADER: Step = class_has("div", "dzuq1e");
const HEADER_BODY: Step = class_is("div", "nMlfCf");
const META: Step = class_is("div", "eRzjb");
const AVATAR_LINK: Step = class_has("a", "X1U4Ie");
const PERMALINK: Step = class_is("a", "qXj2He");

// Attachment blocks
const ATTACHMENT: Step = class_is("div", "tjHUud");
const MEDIA: Step = class_is("div", "njiUWc");
const RESHARE: Step = jsname("div", "MTOxpb");
const PREVIEW: Step = class_is("div", "rr9Dof");
const PREVIEW_IMAGE: Step = class_is("div", "E68jgf");

pub const AUTHOR_NAME: FieldRule = FieldRule {
    name: "author.name",
    patterns: &[QueryPattern {
        steps: &[
            HEADER,
            HEADER_BODY,
            class_is("div", "Cd5D8b"),
            class_is("div", "xHn24c"),
            tag("a"),
        ],
        target: Target::Text,
    }],
};

pub const AUTHOR_URL: FieldRule = FieldRule {
    name: "author.url",
    patterns: &[QueryPattern {
        steps: &[HEADER, AVATAR_LINK],
        target: Target::Attr("href"),
    }],
};

pub const AUTHOR_ICON: FieldRule = FieldRule {
    name: "author.icon_url",
    patterns: &[QueryPattern {
        steps: &[HEADER, AVATAR_LINK, tag("img")],
        target: Target::Attr("src"),
    }],
};

/// Regular post permalink, then the pinned-post permalink
pub const POST_URL: FieldRule = FieldRule {
    name: "url",
    patterns: &[
        QueryPattern {
            steps: &[HEADER, HEADER_BODY, META, PERMALINK],
            target: Target::Attr("href"),
        },
        QueryPattern {
            steps: &[
                HEADER,
                HEADER_BODY,
                META,
                class_is("div", "DsIcbd"),
                class_is("a", "QXSTae"),
            ],
            target: Target::Attr("href"),
        },
    ],
};

/// Relative age token; pinned posts have none
pub const FORMATTED_DATE: FieldRule = FieldRule {
    name: "formatted_date",
    patterns: &[QueryPattern {
        steps: &[HEADER, HEADER_BODY, META, PERMALINK, tag("span")],
        target: Target::Text,
    }],
};

/// Plain post text, reshare's new text, then the reshared caption
pub const COMMENT: FieldRule = FieldRule {
    name: "comment",
    patterns: &[
        QueryPattern {
            steps: &[class_is("div", "ELUvyf"), tag("div"), tag("div"), tag("div")],
            target: Target::Text,
        },
        QueryPattern {
            steps: &[class_is("div", "WIyZac"), tag("div"), tag("div")],
            target: Target::Text,
        },
        QueryPattern {
            steps: &[
                ATTACHMENT,
                class_is("div", "RriDEe"),
                class_has("div", "ahil4d"),
                tag("span"),
            ],
            target: Target::Text,
        },
    ],
};

/// Attachment, reshared attachment, link preview, reshared link preview.
/// Albums are not covered.
pub const IMAGE_URL: FieldRule = FieldRule {
    name: "image.url",
    patterns: &[
        QueryPattern {
            steps: &[
                ATTACHMENT,
                MEDIA,
                tag("div"),
                tag("div"),
                tag("div"),
                tag("div"),
                tag("div"),
                tag("img"),
            ],
            target: Target::Attr("src"),
        },
        QueryPattern {
            steps: &[RESHARE, tag("div"), tag("a"), PREVIEW, PREVIEW_IMAGE, tag("img")],
            target: Target::Attr("src"),
        },
        QueryPattern {
            steps: &[ATTACHMENT, MEDIA, tag("div"), tag("a"), PREVIEW, PREVIEW_IMAGE, tag("img")],
            target: Target::Attr("src"),
        },
        QueryPattern {
            steps: &[
                RESHARE,
                tag("div"),
                tag("div"),
                tag("div"),
                tag("div"),
                tag("div"),
                tag("img"),
            ],
            target: Target::Attr("src"),
        },
    ],
};
