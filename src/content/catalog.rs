//! Bundled article catalog.
//!
//! Used when no `api_base_url` is configured, so the browser works without
//! any running endpoint.

use super::types::{Article, ArticleId, Category};
use std::sync::Arc;

/// Category tags in navigation order.
pub const CATEGORIES: &[&str] = &["learn", "doc"];

/// (slug, title, description, category)
const POSTS: &[(&str, &str, &str, &str)] = &[
    (
        "variables",
        "Variables",
        "Sass uses the $ symbol to make something a variable",
        "learn",
    ),
    (
        "nesting",
        "Nesting",
        "This is a great way to organize your CSS and make it more readable",
        "learn",
    ),
    (
        "partials",
        "Partials",
        "This is a great way to modularize your CSS and help keep things easier to maintain",
        "learn",
    ),
    (
        "modules",
        "Modules",
        "You don't have to write all your Sass in a single file",
        "learn",
    ),
    (
        "mixins",
        "Mixins",
        "A mixin lets you make groups of CSS declarations that you want to reuse throughout your site",
        "learn",
    ),
    (
        "extend",
        "Extend",
        "Using @extend lets you share a set of CSS properties from one selector to another",
        "learn",
    ),
    (
        "operators",
        "Operators",
        "Sass has a handful of standard math operators like +, -, *, math.div(), and %",
        "learn",
    ),
    (
        "syntax",
        "Syntax",
        "Sass supports two different syntaxes. Each one can load the other, so it's up to you and your team which one to choose",
        "doc",
    ),
    (
        "parsing-stylesheet",
        "Parsing a Stylesheet",
        "A Sass stylesheet is parsed from a sequence of Unicode code points. It's parsed directly, without first being converted to a token stream",
        "doc",
    ),
];

/// All bundled articles, in catalog order.
pub fn articles() -> Vec<Article> {
    POSTS
        .iter()
        .map(|(slug, title, description, category)| Article {
            id: ArticleId::from(*slug),
            name: Some(Arc::from(*slug)),
            title: Arc::from(*title),
            description: Arc::from(*description),
            category: Arc::from(*category),
        })
        .collect()
}

pub fn categories() -> Vec<Category> {
    CATEGORIES.iter().map(|c| Category::new(c)).collect()
}
