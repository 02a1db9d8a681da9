mod common;

use common::run;

#[test]
fn instances_store_fields_set_after_construction() {
    let source = r#"
        class Bagel {}
        var bagel = Bagel();
        bagel.flavor = "plain";
        print bagel.flavor;
    "#;
    assert_eq!(run(source), "plain\n");
}

#[test]
fn methods_can_reference_this() {
    let source = r#"
        class Cake {
            taste() {
                var adjective = "delicious";
                print "The " + this.flavor + " cake is " + adjective + "!";
            }
        }
        var cake = Cake();
        cake.flavor = "German chocolate";
        cake.taste();
    "#;
    assert_eq!(run(source), "The German chocolate cake is delicious!\n");
}

#[test]
fn init_method_runs_on_construction_and_returns_the_instance() {
    let source = r#"
        class Point {
            init(x, y) {
                this.x = x;
                this.y = y;
            }
            sum() {
                return this.x + this.y;
            }
        }
        var p = Point(3, 4);
        print p.sum();
    "#;
    assert_eq!(run(source), "7\n");
}

#[test]
fn bare_return_inside_init_still_yields_the_constructed_instance() {
    let source = r#"
        class Point {
            init(x, y) {
                this.x = x;
                this.y = y;
                return;
            }
        }
        var p = Point(1, 2);
        print p.x + p.y;
    "#;
    assert_eq!(run(source), "3\n");
}

#[test]
fn subclass_inherits_superclass_methods() {
    let source = r#"
        class Doughnut {
            cook() {
                print "Fry until golden brown.";
            }
        }
        class BostonCream < Doughnut {}
        BostonCream().cook();
    "#;
    assert_eq!(run(source), "Fry until golden brown.\n");
}

#[test]
fn super_calls_the_overridden_method_on_the_parent_class() {
    let source = r#"
        class Doughnut {
            cook() {
                print "Fry until golden brown.";
            }
        }
        class BostonCream < Doughnut {
            cook() {
                super.cook();
                print "Pipe full of custard and coat with chocolate.";
            }
        }
        BostonCream().cook();
    "#;
    assert_eq!(run(source), "Fry until golden brown.\nPipe full of custard and coat with chocolate.\n");
}

#[test]
fn class_and_instance_print_with_name() {
    let source = r#"
        class Foo {}
        print Foo;
        print Foo();
    "#;
    assert_eq!(run(source), "Foo\nFoo instance\n");
}
