//! Integration tests for protots-typegen.

use protots_typegen::descriptor::{FieldDescriptor, MessageDescriptor, SchemaFile, WireType};
use protots_typegen::{
    Diagnostic, Error, Generated, Options, SchemaSet, builder, generate, parse_descriptor_set_json,
};

fn load_fixture(name: &str) -> SchemaSet {
    let path = format!("tests/fixtures/{}.json", name);
    let content =
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("fixture {} not found", name));
    parse_descriptor_set_json(&content).expect("invalid descriptor set")
}

fn file<'g>(generated: &'g Generated, path: &str) -> &'g str {
    generated
        .files
        .iter()
        .find(|f| f.path == path)
        .map(|f| f.content.as_str())
        .unwrap_or_else(|| panic!("{path} not generated"))
}

// === Layout ===

#[test]
fn shop_emission_order() {
    let generated = generate(&load_fixture("shop"), &Options::default()).unwrap();
    let paths: Vec<&str> = generated.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(
        paths,
        [
            "twirp.ts",
            "common/money.ts",
            "common/index.ts",
            "google/protobuf/timestamp.ts",
            "google/protobuf/index.ts",
            "shop/v1/item.ts",
            "shop/v1/order.ts",
            "shop/v1/index.ts",
        ]
    );
}

#[test]
fn shop_index() {
    let generated = generate(&load_fixture("shop"), &Options::default()).unwrap();
    insta::assert_snapshot!(file(&generated, "shop/v1/index.ts"), @r"
    // Code generated by protots. DO NOT EDIT.

    export * from './item'
    export * from './order'
    ");
}

#[test]
fn runtime_and_index_can_be_disabled() {
    let options = Options {
        emit_runtime: false,
        emit_index: false,
        ..Default::default()
    };
    let generated = generate(&load_fixture("shop"), &options).unwrap();
    assert_eq!(generated.files.len(), 4);
    assert!(generated.files.iter().all(|f| !f.path.ends_with("index.ts")));
    assert!(generated.files.iter().all(|f| f.path != "twirp.ts"));
}

#[test]
fn generation_is_deterministic() {
    let set = load_fixture("shop");
    let first = generate(&set, &Options::default()).unwrap();
    let second = generate(&set, &Options::default()).unwrap();
    assert_eq!(first.files, second.files);
}

// === Messages ===

#[test]
fn money_file() {
    let generated = generate(&load_fixture("shop"), &Options::default()).unwrap();
    insta::assert_snapshot!(file(&generated, "common/money.ts"), @r"
    /* tslint:disable */
    /* eslint-disable */

    // Code generated by protots from common/money.proto. DO NOT EDIT.

    export interface IMoney {
      currency?: string
      units?: number
      toJSON?(): object
    }

    export interface IMoneyJSON {
      currency?: string
      units?: number
    }

    export class Money implements IMoney {
      private _currency?: string
      private _units?: number

      constructor(m?: IMoney) {
        if (m) {
          this._currency = m.currency
          this._units = m.units
        }
      }

      // currency (currency)
      public get currency(): string | undefined {
        return this._currency
      }
      public set currency(value: string | undefined) {
        this._currency = value
      }

      // units (units)
      public get units(): number | undefined {
        return this._units
      }
      public set units(value: number | undefined) {
        this._units = value
      }

      static fromJSON(m: IMoneyJSON): Money {
        return new Money({
          currency: m['currency'],
          units: m['units']
        })
      }

      public toJSON(): IMoneyJSON {
        return {
          'currency': this._currency,
          'units': this._units
        }
      }
    }
    ");
}

#[test]
fn item_interfaces() {
    let generated = generate(&load_fixture("shop"), &Options::default()).unwrap();
    let item = file(&generated, "shop/v1/item.ts");

    assert!(item.contains("// Code generated by protots from shop/v1/item.proto. DO NOT EDIT."));
    assert!(item.contains("export enum Color {\n  COLOR_UNSPECIFIED = 0,\n  RED = 1,\n}"));

    assert!(item.contains(
        "export interface IItem {\n  name?: string\n  qty?: number\n  tags?: string[]\n  \
         unitPrice?: Money\n  color?: Color\n  createdAt?: Date\n  seenAt?: Date[]\n  \
         toJSON?(): object\n}"
    ));
    assert!(item.contains(
        "export interface IItemJSON {\n  name?: string\n  qty?: number\n  tags?: string[]\n  \
         unit_price?: IMoneyJSON\n  color?: Color\n  created_at?: string\n  seen_at?: string[]\n}"
    ));
    assert!(item.contains("export class Item implements IItem {"));
}

#[test]
fn item_conversions() {
    let generated = generate(&load_fixture("shop"), &Options::default()).unwrap();
    let item = file(&generated, "shop/v1/item.ts");

    assert!(item.contains("tags: m['tags'] === undefined ? undefined : m['tags'].map((v) => String(v)),"));
    assert!(item.contains(
        "unitPrice: m['unit_price'] === undefined ? undefined : Money.fromJSON(m['unit_price']),"
    ));
    assert!(item.contains(
        "createdAt: m['created_at'] === undefined ? undefined : new Date(m['created_at']),"
    ));
    assert!(item.contains("'tags': this._tags,"));
    assert!(item.contains(
        "'unit_price': this._unitPrice === undefined ? undefined : this._unitPrice.toJSON(),"
    ));
    assert!(item.contains(
        "'seen_at': this._seenAt === undefined ? undefined : this._seenAt.map((v) => v.toISOString())"
    ));
}

#[test]
fn map_field_is_skipped() {
    let generated = generate(&load_fixture("shop"), &Options::default()).unwrap();
    let item = file(&generated, "shop/v1/item.ts");
    assert!(!item.contains("labels"));
    assert!(!item.contains("LabelsEntry"));
}

// === Imports ===

#[test]
fn item_imports() {
    let generated = generate(&load_fixture("shop"), &Options::default()).unwrap();
    let item = file(&generated, "shop/v1/item.ts");

    assert!(item.contains("import { IMoneyJSON, Money } from '../../common/money'\n"));
    assert!(item.contains(
        "import { createTwirpRequest, Fetch, throwTwirpError } from '../../twirp'\n"
    ));
    // Timestamp maps to Date and never pulls in the declaring file.
    assert!(!item.contains("google/protobuf"));
    // Same-file references never import.
    assert!(!item.contains("from './item'"));
}

#[test]
fn order_imports_collapse_per_file() {
    let generated = generate(&load_fixture("shop"), &Options::default()).unwrap();
    let order = file(&generated, "shop/v1/order.ts");

    let imports: Vec<&str> = order.lines().filter(|l| l.starts_with("import ")).collect();
    assert_eq!(
        imports,
        [
            "import { IMoneyJSON, Money } from '../../common/money'",
            "import { IItemJSON, Item } from './item'",
        ]
    );
    // No services, no runtime import.
    assert!(!order.contains("twirp"));
}

#[test]
fn order_nested_enum() {
    let generated = generate(&load_fixture("shop"), &Options::default()).unwrap();
    let order = file(&generated, "shop/v1/order.ts");

    let enum_at = order.find("export enum Order_Status {").unwrap();
    let interface_at = order.find("export interface IOrder {").unwrap();
    assert!(enum_at < interface_at);
    assert!(order.contains("  status?: Order_Status\n"));
    assert!(order.contains("  items?: Item[]\n"));
    assert!(order.contains("  items?: IItemJSON[]\n"));
    assert!(order.contains("items: m['items'] === undefined ? undefined : m['items'].map((v) => Item.fromJSON(v)),"));
}

// === Services ===

#[test]
fn item_service_client() {
    let generated = generate(&load_fixture("shop"), &Options::default()).unwrap();
    let item = file(&generated, "shop/v1/item.ts");

    assert!(item.contains(
        "export interface IItemService {\n  getItem: (params: GetItemRequest, headers?: object) => Promise<Item>\n}"
    ));
    assert!(item.contains("export class ItemService implements IItemService {"));
    assert!(item.contains("  private path = '/twirp/shop.v1.ItemService/'\n"));
    assert!(item.contains(
        "  public getItem(params: GetItemRequest, headers: object = {}): Promise<Item> {\n    \
         return this.fetch(\n      this.url('GetItem'),\n      createTwirpRequest(params, headers)\n    \
         ).then((res) => {\n      if (!res.ok) {\n        return throwTwirpError(res)\n      }\n      \
         return res.json().then((m) => {\n        return Item.fromJSON(m)\n      })\n    })\n  }\n"
    ));
}

#[test]
fn path_prefix_option() {
    let options = Options::from_parameter("path_prefix=/api/rpc/").unwrap();
    let generated = generate(&load_fixture("shop"), &options).unwrap();
    let item = file(&generated, "shop/v1/item.ts");
    assert!(item.contains("private path = '/api/rpc/shop.v1.ItemService/'"));
}

#[test]
fn runtime_module_option() {
    let options = Options::from_parameter("runtime_module=rpc").unwrap();
    let generated = generate(&load_fixture("shop"), &options).unwrap();
    assert_eq!(generated.files[0].path, "rpc.ts");
    assert!(generated.files[0].content.contains("export const createTwirpRequest"));
    assert!(file(&generated, "shop/v1/item.ts").contains("from '../../rpc'"));
}

#[test]
fn rootless_package() {
    let generated = generate(&load_fixture("rootless"), &Options::default()).unwrap();
    let paths: Vec<&str> = generated.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, ["twirp.ts", "ping.ts", "index.ts"]);

    let ping = file(&generated, "ping.ts");
    assert!(ping.contains("from './twirp'"));
    assert!(ping.contains("private path = '/twirp/Health/'"));
    assert!(ping.contains("flags: m['flags'] === undefined ? undefined : m['flags'].map((v) => Boolean(v))"));
    assert!(ping.contains("check: (params: Ping, headers?: object) => Promise<Ping>"));
}

// === Diagnostics ===

#[test]
fn recoverable_problems_are_reported() {
    let generated = generate(&load_fixture("shop"), &Options::default()).unwrap();
    assert_eq!(
        generated.diagnostics,
        [
            Diagnostic::MapField {
                file: "shop/v1/item.proto".into(),
                message: "Item".into(),
                field: "labels".into(),
            },
            Diagnostic::UnknownFieldType {
                file: "shop/v1/order.proto".into(),
                field: "Order.receipt".into(),
                wire_type: "Bytes".into(),
            },
            Diagnostic::UnresolvedType {
                file: "shop/v1/order.proto".into(),
                context: "Order.coupon".into(),
                type_name: ".promo.v1.Coupon".into(),
            },
        ]
    );

    let order = file(&generated, "shop/v1/order.ts");
    assert!(order.contains("  receipt?: string\n"));
    assert!(order.contains("  coupon?: Coupon\n"));
    assert!(!order.contains("promo"));
}

#[test]
fn model_is_inspectable() {
    let model = builder::build(&load_fixture("shop"), "ts").unwrap();
    let item = model.file("shop/v1/item.ts").unwrap();
    assert_eq!(item.relative_import_base, "../../");
    assert_eq!(item.imports.len(), 1);

    let order = model.file("shop/v1/order.ts").unwrap();
    assert_eq!(order.imports.len(), 2);
    let status = order.message("Order").unwrap().field("status").unwrap();
    assert_eq!(status.accessor, "status");
}

#[test]
fn duplicate_declaration_is_fatal() {
    let mut set = load_fixture("shop");
    let mut again = set.files[0].clone();
    again.name = "common/money_copy.proto".into();
    set.files.push(again);

    let err = generate(&set, &Options::default()).unwrap_err();
    assert!(matches!(err, Error::DuplicateDeclaration { .. }));
    assert!(err.to_string().contains(".common.Money"));
}

#[test]
fn duplicate_output_path_is_fatal() {
    let mut set = load_fixture("shop");
    let again = set.files[0].clone();
    set.files.push(again);

    let err = generate(&set, &Options::default()).unwrap_err();
    assert!(matches!(err, Error::DuplicateOutputPath { .. }));
    assert_eq!(
        err.to_string(),
        "common/money.proto and common/money.proto both generate common/money.ts"
    );
}

#[test]
fn skipped_nested_types_never_leak_into_siblings() {
    let set = SchemaSet::new(vec![
        SchemaFile::new("a.proto", "a")
            .with_message(
                MessageDescriptor::new("Item")
                    .with_nested_message(MessageDescriptor::new("Part"))
                    .with_field(FieldDescriptor::reference(
                        "part",
                        1,
                        WireType::Message,
                        ".a.Item.Part",
                    )),
            )
            .with_message(MessageDescriptor::new("Other").with_field(
                FieldDescriptor::reference("part", 1, WireType::Message, ".a.Item.Part"),
            )),
    ]);

    let generated = generate(&set, &Options::default()).unwrap();
    assert!(!file(&generated, "a/a.ts").contains("Item_Part"));
    assert!(
        generated
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::SkippedField { field, .. } if field == "Other.part"))
    );
}
