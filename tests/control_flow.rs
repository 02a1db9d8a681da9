mod common;

use common::run;

#[test]
fn if_else_picks_the_right_branch() {
    let source = r#"
        if (1 < 2) print "yes"; else print "no";
        if (1 > 2) print "yes"; else print "no";
    "#;
    assert_eq!(run(source), "yes\nno\n");
}

#[test]
fn while_loop_counts_up() {
    let source = r#"
        var i = 0;
        while (i < 3) {
            print i;
            i = i + 1;
        }
    "#;
    assert_eq!(run(source), "0\n1\n2\n");
}

#[test]
fn for_loop_desugars_correctly() {
    let source = r#"
        for (var i = 0; i < 3; i = i + 1) {
            print i;
        }
    "#;
    assert_eq!(run(source), "0\n1\n2\n");
}

#[test]
fn block_scoping_shadows_outer_variable() {
    let source = r#"
        var a = "outer";
        {
            var a = "inner";
            print a;
        }
        print a;
    "#;
    assert_eq!(run(source), "inner\nouter\n");
}

#[test]
fn nested_loop_with_break_like_early_exit_via_while_condition() {
    let source = r#"
        var i = 0;
        var found = false;
        while (i < 5 and !found) {
            if (i == 2) found = true;
            else i = i + 1;
        }
        print i;
    "#;
    assert_eq!(run(source), "2\n");
}
