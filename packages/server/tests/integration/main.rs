
mod auth;
mod images;
mod ingest_failures;
mod scrolling;
