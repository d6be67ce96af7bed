use mpd_client::responses::Song;
use mpd_client::tag::Tag;

/// The current song as seen by one render cycle: its URI and the first value of each
/// tag some token reads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SongSnapshot {
    uri: String,
    tags: Vec<(Tag, String)>,
}

impl SongSnapshot {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            tags: Vec::new(),
        }
    }

    /// Adds a value for `tag`. Only the first value stored for a tag is kept.
    pub fn with_tag(mut self, tag: Tag, value: impl Into<String>) -> Self {
        if !self.tags.iter().any(|(t, _)| *t == tag) {
            self.tags.push((tag, value.into()));
        }
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn tag(&self, tag: &Tag) -> &str {
        self.tags
            .iter()
            .find(|(t, _)| t == tag)
            .map_or("", |(_, value)| value.as_str())
    }
}

impl From<&Song> for SongSnapshot {
    fn from(song: &Song) -> Self {
        TOKENS
            .iter()
            .filter_map(|token| match &token.source {
                Source::Tag(tag) => Some(tag),
                Source::Uri => None,
            })
            .fold(SongSnapshot::new(song.url.clone()), |snapshot, tag| {
                match song.tags.get(tag).and_then(|values| values.first()) {
                    Some(value) => snapshot.with_tag(tag.clone(), value.clone()),
                    None => snapshot,
                }
            })
    }
}

/// Where a token's text comes from.
#[derive(Debug)]
pub enum Source {
    Uri,
    Tag(Tag),
}

/// A `%name` placeholder bound to the song data it prints.
#[derive(Debug)]
pub struct Token {
    pub name: &'static str,
    pub source: Source,
}

impl Token {
    pub fn resolve<'s>(&self, song: &'s SongSnapshot) -> &'s str {
        match &self.source {
            Source::Uri => song.uri(),
            Source::Tag(tag) => song.tag(tag),
        }
    }
}

/// Recognised tokens, matched in this order.
///
/// Matching is by prefix, so `album` shadows `album-artist`: `%album-artist` renders the
/// album followed by a literal `-artist`. Use `%albart` for the album artist.
pub static TOKENS: [Token; 11] = [
    Token {
        name: "path",
        source: Source::Uri,
    },
    Token {
        name: "title",
        source: Source::Tag(Tag::Title),
    },
    Token {
        name: "artist",
        source: Source::Tag(Tag::Artist),
    },
    Token {
        name: "album",
        source: Source::Tag(Tag::Album),
    },
    Token {
        name: "date",
        source: Source::Tag(Tag::Date),
    },
    Token {
        name: "track",
        source: Source::Tag(Tag::Track),
    },
    Token {
        name: "album-artist",
        source: Source::Tag(Tag::AlbumArtist),
    },
    Token {
        name: "albart",
        source: Source::Tag(Tag::AlbumArtist),
    },
    Token {
        name: "comment",
        source: Source::Tag(Tag::Comment),
    },
    Token {
        name: "composer",
        source: Source::Tag(Tag::Composer),
    },
    Token {
        name: "genre",
        source: Source::Tag(Tag::Genre),
    },
];
