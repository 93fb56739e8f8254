mod draw;
mod perft;
