mod interchange;
mod tokenizer;
