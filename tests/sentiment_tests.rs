use findash::news::sentiment::{classify, Sentiment};
use findash::news::types::RawArticle;

#[test]
fn positive_keywords_win_over_negative() {
    assert_eq!(classify("shares hit new low"), Sentiment::Positive);
    assert_eq!(classify("strong quarter"), Sentiment::Positive);
    assert_eq!(classify("outlook is weak"), Sentiment::Negative);
    assert_eq!(classify("markets down again"), Sentiment::Negative);
    assert_eq!(classify("board meeting scheduled"), Sentiment::Neutral);
}

#[test]
fn matching_is_case_sensitive() {
    assert_eq!(classify("STRONG results"), Sentiment::Neutral);
    assert_eq!(classify("Weak demand"), Sentiment::Neutral);
}

#[test]
fn sentiment_displays_as_word() {
    assert_eq!(Sentiment::Positive.to_string(), "Positive");
    assert_eq!(Sentiment::Neutral.to_string(), "Neutral");
}

#[test]
/// Verifies raw articles are tagged and untitled ones dropped.
fn raw_article_conversion() {
    let raw: RawArticle = serde_json::from_str(
        r#"{"source":{"name":"Mint"},"title":"Demand falls to low","url":"https://x","publishedAt":"2024-01-02T03:04:05Z"}"#,
    )
    .expect("article should parse");
    let article = raw.into_article().expect("titled article is kept");
    assert_eq!(article.sentiment, Sentiment::Negative);
    assert_eq!(article.source_name, "Mint");
    assert_eq!(article.published_at, "2024-01-02T03:04:05Z");

    let untitled: RawArticle =
        serde_json::from_str(r#"{"title":null,"url":"https://y"}"#).expect("article should parse");
    assert!(untitled.into_article().is_none());
}
