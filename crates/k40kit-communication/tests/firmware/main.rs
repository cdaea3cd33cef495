mod emulator;
mod status_parser;
