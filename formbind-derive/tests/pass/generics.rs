use formbind::{Form, FormValue};

#[derive(Default, Form)]
struct Filter<T> {
    #[form(num = "0 100")]
    value: T,
    history: Vec<T>,
    #[form(skip)]
    note: Option<std::rc::Rc<u8>>,
}

fn assert_form<F: Form>() {}

fn check<T: FormValue + Default + 'static>() {
    assert_form::<Filter<T>>();
}

fn main() {
    check::<i32>();
    check::<f64>();
}
