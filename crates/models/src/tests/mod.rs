/// Entity construction, allow-list copies and inserts against a mock connection
pub mod entity_tests;
