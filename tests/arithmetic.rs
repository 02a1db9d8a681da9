mod common;

use common::run;

#[test]
fn operator_precedence_and_grouping() {
    assert_eq!(run("print (1 + 2) * 3;"), "6\n");
}

#[test]
fn integer_valued_numbers_print_without_trailing_zero() {
    assert_eq!(run("print 10 / 2;"), "5\n");
}

#[test]
fn string_concatenation_with_plus() {
    assert_eq!(run("print \"foo\" + \"bar\";"), "foobar\n");
}

#[test]
fn comparison_operators() {
    assert_eq!(run("print 1 < 2; print 2 <= 2; print 3 > 4;"), "true\ntrue\nfalse\n");
}

#[test]
fn equality_across_types_is_false_not_an_error() {
    assert_eq!(run("print 1 == \"1\"; print nil == false;"), "false\nfalse\n");
}

#[test]
fn logical_and_or_short_circuit_and_return_operand_values() {
    assert_eq!(run("print nil or \"default\"; print false and \"never\";"), "default\nfalse\n");
}

#[test]
fn unary_negation_and_not() {
    assert_eq!(run("print -5; print !true; print !nil;"), "-5\ntrue\ntrue\n");
}
