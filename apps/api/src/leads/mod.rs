// Lead input: CSV upload parsing and validation.

pub mod ingest;
