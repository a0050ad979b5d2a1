//! Knowledge-base property paths read by the extractor.

/// Canonical display name of any topic.
pub const NAME: &str = "/type/object/name";
/// Free-text description of any topic.
pub const DESCRIPTION: &str = "/common/topic/description";

/// Record type of series episodes.
pub const EPISODE_TYPE: &str = "/tv/tv_series_episode";
pub const EPISODE_AIR_DATE: &str = "/tv/tv_series_episode/air_date";
pub const EPISODE_SEASON_NUMBER: &str = "/tv/tv_series_episode/season_number";
pub const EPISODE_NUMBER: &str = "/tv/tv_series_episode/episode_number";
pub const EPISODE_DIRECTOR: &str = "/tv/tv_series_episode/director";
pub const EPISODE_PRODUCERS: &str = "/tv/tv_series_episode/producers";

/// Record type of films.
pub const FILM_TYPE: &str = "/film/film";
pub const FILM_RELEASE_DATE: &str = "/film/film/initial_release_date";
pub const FILM_RATING: &str = "/film/film/rating";
pub const FILM_GENRE: &str = "/film/film/genre";
pub const FILM_DIRECTED_BY: &str = "/film/film/directed_by";
pub const FILM_PRODUCED_BY: &str = "/film/film/produced_by";
/// Compound: one value per cut, each holding [`FILM_CUT_RUNTIME`].
pub const FILM_RUNTIME: &str = "/film/film/runtime";
pub const FILM_CUT_RUNTIME: &str = "/film/film_cut/runtime";
/// Compound: one value per performance, each holding [`PERFORMANCE_ACTOR`].
pub const FILM_STARRING: &str = "/film/film/starring";
pub const PERFORMANCE_ACTOR: &str = "/film/performance/actor";
