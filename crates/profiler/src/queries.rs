//! GraphQL documents for `contributionsCollection`. Both take `$login`,
//! `$from` and `$to`; a collection may span at most one year.

macro_rules! repo_contribution_fields {
    () => {
        "repository { name url description isPrivate owner { __typename login } \
         languages(first: 1, orderBy: {field: SIZE, direction: DESC}) { nodes { name } } } \
         contributions { totalCount }"
    };
}

pub const CALENDAR_QUERY: &str = "\
query($login: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $login) {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        totalContributions
        weeks { contributionDays { date contributionCount } }
      }
    }
  }
}";

pub const REPOSITORY_QUERY: &str = concat!(
    "query($login: String!, $from: DateTime!, $to: DateTime!) {\n",
    "  user(login: $login) {\n",
    "    contributionsCollection(from: $from, to: $to) {\n",
    "      commitContributionsByRepository(maxRepositories: 100) { ",
    repo_contribution_fields!(),
    " }\n",
    "      issueContributionsByRepository(maxRepositories: 100) { ",
    repo_contribution_fields!(),
    " }\n",
    "      pullRequestContributionsByRepository(maxRepositories: 100) { ",
    repo_contribution_fields!(),
    " }\n",
    "      pullRequestReviewContributionsByRepository(maxRepositories: 100) { ",
    repo_contribution_fields!(),
    " }\n",
    "    }\n",
    "  }\n",
    "}"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_query_selects_every_contribution_kind() {
        for field in [
            "commitContributionsByRepository",
            "issueContributionsByRepository",
            "pullRequestContributionsByRepository",
            "pullRequestReviewContributionsByRepository",
        ] {
            assert!(REPOSITORY_QUERY.contains(field), "{field} missing");
        }
        assert_eq!(REPOSITORY_QUERY.matches("__typename").count(), 4);
        assert!(CALENDAR_QUERY.contains("contributionCount"));
    }
}
