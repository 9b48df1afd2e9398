//! GraphQL documents sent to the Projects API

/// Resolve a project by organization login and project number
pub const PROJECT_QUERY: &str = r#"
query GetProject($org: String!, $projectNumber: Int!) {
  organization(login: $org) {
    projectV2(number: $projectNumber) {
      id
      number
      title
      shortDescription
      public
      closed
      createdAt
      updatedAt
      url
    }
  }
}
"#;

/// One page of project items with their content and custom field values
pub const ITEMS_QUERY: &str = r#"
query GetProjectItems($projectId: ID!, $first: Int!, $after: String) {
  node(id: $projectId) {
    ... on ProjectV2 {
      items(first: $first, after: $after) {
        pageInfo {
          hasNextPage
          endCursor
        }
        nodes {
          id
          type
          isArchived
          content {
            __typename
            ... on Issue {
              id
              number
              title
              body
              state
              createdAt
              updatedAt
              url
              author { login }
              assignees(first: 20) { nodes { login } }
              labels(first: 20) { nodes { name color } }
              repository { name owner { login } }
              parent { id title number }
              subIssues(first: 50) { nodes { id title number } }
              subIssuesSummary { total completed percentCompleted }
            }
            ... on PullRequest {
              id
              number
              title
              body
              state
              merged
              createdAt
              updatedAt
              url
              author { login }
              assignees(first: 20) { nodes { login } }
              labels(first: 20) { nodes { name color } }
              repository { name owner { login } }
            }
            ... on DraftIssue {
              id
              title
              body
              createdAt
              updatedAt
              creator { login }
              assignees(first: 20) { nodes { login } }
            }
          }
          fieldValues(first: 30) {
            nodes {
              __typename
              ... on ProjectV2ItemFieldTextValue {
                text
                field { ... on ProjectV2FieldCommon { name } }
              }
              ... on ProjectV2ItemFieldNumberValue {
                number
                field { ... on ProjectV2FieldCommon { name } }
              }
              ... on ProjectV2ItemFieldSingleSelectValue {
                name
                field { ... on ProjectV2FieldCommon { name } }
              }
              ... on ProjectV2ItemFieldDateValue {
                date
                field { ... on ProjectV2FieldCommon { name } }
              }
              ... on ProjectV2ItemFieldIterationValue {
                title
                startDate
                duration
                field { ... on ProjectV2FieldCommon { name } }
              }
              ... on ProjectV2ItemFieldUserValue {
                users(first: 20) { nodes { login } }
                field { ... on ProjectV2FieldCommon { name } }
              }
              ... on ProjectV2ItemFieldLabelValue {
                labels(first: 20) { nodes { name } }
                field { ... on ProjectV2FieldCommon { name } }
              }
              ... on ProjectV2ItemFieldMilestoneValue {
                milestone { title }
                field { ... on ProjectV2FieldCommon { name } }
              }
              ... on ProjectV2ItemFieldRepositoryValue {
                repository { nameWithOwner }
                field { ... on ProjectV2FieldCommon { name } }
              }
              ... on ProjectV2ItemFieldPullRequestValue {
                pullRequests(first: 20) { nodes { number } }
                field { ... on ProjectV2FieldCommon { name } }
              }
              ... on ProjectV2ItemFieldReviewerValue {
                reviewers(first: 20) { nodes { ... on User { login } ... on Team { name } } }
                field { ... on ProjectV2FieldCommon { name } }
              }
              ... on ProjectV2ItemFieldValueCommon {
                field { ... on ProjectV2FieldCommon { name } }
              }
            }
          }
        }
      }
    }
  }
}
"#;
