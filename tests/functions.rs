mod common;

use common::run;

#[test]
fn recursive_fibonacci() {
    let source = r#"
        fun fib(n) {
            if (n <= 1) return n;
            return fib(n - 1) + fib(n - 2);
        }
        print fib(8);
    "#;
    assert_eq!(run(source), "21\n");
}

#[test]
fn closures_capture_their_defining_environment() {
    let source = r#"
        fun makeCounter() {
            var count = 0;
            fun counter() {
                count = count + 1;
                return count;
            }
            return counter;
        }
        var counter = makeCounter();
        print counter();
        print counter();
        print counter();
    "#;
    assert_eq!(run(source), "1\n2\n3\n");
}

#[test]
fn function_without_return_yields_nil() {
    let source = r#"
        fun sayHi(first, last) {
            print "Hi, " + first + " " + last + "!";
        }
        print sayHi("Dear", "Reader");
    "#;
    assert_eq!(run(source), "Hi, Dear Reader!\nnil\n");
}

#[test]
fn function_value_prints_as_fn_with_name() {
    assert_eq!(run("fun greet() {} print greet;"), "<fn greet>\n");
}

#[test]
fn clock_native_function_is_callable_and_returns_a_number() {
    let source = r#"
        var t = clock();
        print t >= 0;
    "#;
    assert_eq!(run(source), "true\n");
}
