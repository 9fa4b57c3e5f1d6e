//! Topic ranking from the priority-guidance document
//!
//! The guidance document is free text (a mission statement, a weekly focus
//! note). It is treated as an opaque hint source: known topic names are
//! looked up as case-insensitive substrings, and topics that appear are
//! ranked by first occurrence. Nothing else about the document is
//! interpreted.

use super::question::Topic;

/// Derives an ordered topic ranking from guidance text
///
/// Topics not mentioned in the text are absent from the ranking. Ties on
/// position (one topic name containing another at the same offset) resolve
/// to the caller's topic order.
pub fn rank_topics(guidance: &str, topics: &[String]) -> Vec<String> {
    let haystack = guidance.to_lowercase();

    let mut found: Vec<(usize, &String)> = topics
        .iter()
        .filter_map(|topic| {
            haystack
                .find(&topic.to_lowercase())
                .map(|pos| (pos, topic))
        })
        .collect();

    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, topic)| topic.clone()).collect()
}

/// Scores a topic against a ranking
///
/// A topic at position `i` in a ranking of length `n` scores `n - i`;
/// unranked topics and the profile topic score 0.
pub fn priority_score(topic: &Topic, ranking: &[String]) -> usize {
    match topic {
        Topic::Profile => 0,
        Topic::Named(name) => ranking
            .iter()
            .position(|ranked| ranked == name)
            .map(|i| ranking.len() - i)
            .unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topics(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn ranks_by_first_occurrence() {
        let guidance = "\
# This quarter

Top priority is the Job Search Strategy work. After that, invest in
Family Relationships. Health can wait.";

        let ranking = rank_topics(
            guidance,
            &topics(&["Family Relationships", "Job Search Strategy", "Hobbies"]),
        );

        assert_eq!(
            ranking,
            topics(&["Job Search Strategy", "Family Relationships"])
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        let ranking = rank_topics("focus on HEALTH above all", &topics(&["Health"]));
        assert_eq!(ranking, topics(&["Health"]));
    }

    #[test]
    fn unmentioned_topics_are_absent() {
        let ranking = rank_topics("nothing relevant here", &topics(&["Health", "Career"]));
        assert!(ranking.is_empty());
    }

    #[test]
    fn scores_decrease_down_the_ranking() {
        let ranking = topics(&["Job Search Strategy", "Family Relationships"]);

        assert_eq!(
            priority_score(&Topic::Named("Job Search Strategy".into()), &ranking),
            2
        );
        assert_eq!(
            priority_score(&Topic::Named("Family Relationships".into()), &ranking),
            1
        );
        assert_eq!(priority_score(&Topic::Named("Hobbies".into()), &ranking), 0);
    }

    #[test]
    fn profile_topic_always_scores_zero() {
        let ranking = topics(&["Profile"]);
        assert_eq!(priority_score(&Topic::Profile, &ranking), 0);
    }

    #[test]
    fn empty_ranking_scores_zero() {
        assert_eq!(priority_score(&Topic::Named("Health".into()), &[]), 0);
    }
}
