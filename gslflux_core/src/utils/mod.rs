pub(crate) mod number_format;
