use formbind::Form;

#[derive(Form)]
struct Pair(u8, u8);

fn main() {}
