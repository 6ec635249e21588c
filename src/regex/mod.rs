// Cached regular expressions used when classifying embedded code

#[macro_use]
mod cache;
