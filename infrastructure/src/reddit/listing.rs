use chrono::{DateTime, Utc};
use domain::ports::reddit::Link;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
struct Listing {
    data: ListingData,
}

#[derive(Deserialize, Debug)]
struct ListingData {
    children: Vec<Child>,
}

#[derive(Deserialize, Debug)]
struct Child {
    data: Submission,
}

#[derive(Deserialize, Debug)]
struct Submission {
    id: String,
    subreddit: String,
    title: String,
    author: String,
    permalink: String,
    url: Option<String>,
    #[serde(default)]
    is_self: bool,
    #[serde(rename = "over_18", default)]
    nsfw: bool,
    created_utc: f64,
}

impl From<Submission> for Link {
    fn from(submission: Submission) -> Self {
        let Submission {
            id,
            subreddit,
            title,
            author,
            permalink,
            url,
            is_self,
            nsfw,
            created_utc,
        } = submission;

        Link {
            id,
            subreddit,
            title,
            author,
            permalink,
            url: url.filter(|_| !is_self),
            nsfw,
            created_at: DateTime::<Utc>::from_timestamp(created_utc as i64, 0).unwrap_or_default(),
        }
    }
}

pub fn parse_listing(listing: &str) -> Result<Vec<Link>, serde_json::Error> {
    let Listing { data } = serde_json::from_str(listing)?;

    Ok(data
        .children
        .into_iter()
        .map(|child| Link::from(child.data))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"{
        "kind": "Listing",
        "data": {
            "after": "t3_b",
            "children": [
                {
                    "kind": "t3",
                    "data": {
                        "id": "b",
                        "subreddit": "rust",
                        "title": "Image post",
                        "author": "ferris",
                        "permalink": "/r/rust/comments/b/image_post/",
                        "url": "https://i.redd.it/b.png",
                        "is_self": false,
                        "over_18": false,
                        "created_utc": 1700000100.0
                    }
                },
                {
                    "kind": "t3",
                    "data": {
                        "id": "a",
                        "subreddit": "rust",
                        "title": "Text post",
                        "author": "crab",
                        "permalink": "/r/rust/comments/a/text_post/",
                        "url": "https://www.reddit.com/r/rust/comments/a/text_post/",
                        "is_self": true,
                        "over_18": true,
                        "created_utc": 1700000000.0
                    }
                }
            ]
        }
    }"#;

    #[test]
    fn listing_is_parsed_in_order() {
        let links = parse_listing(LISTING).unwrap();

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].id, "b");
        assert_eq!(links[0].url.as_deref(), Some("https://i.redd.it/b.png"));
        assert_eq!(links[0].created_at.timestamp(), 1_700_000_100);
        assert_eq!(links[1].url, None);
        assert!(links[1].nsfw);
    }

    #[test]
    fn html_is_not_a_listing() {
        assert!(parse_listing("<html></html>").is_err());
    }
}
